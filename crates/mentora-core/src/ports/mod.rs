//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod ai;
mod rate_limit;
mod repository;

pub use ai::{AiError, AiProvider, AiRequest, AiResponse};
pub use rate_limit::{Clock, RateLimitDecision, RateLimiter, SystemClock};
pub use repository::{InsertOutcome, ResourceSetRepository, StudyPlanRepository};
