//! # Mentora Infrastructure
//!
//! Concrete implementations of the ports defined in `mentora-core`:
//! MongoDB persistence, the outbound AI provider client, and the
//! in-memory fixed-window rate limiter.

pub mod ai;
pub mod database;
pub mod rate_limit;

pub use ai::{AiConfig, HttpAiProvider};
pub use database::{MongoConfig, MongoConnection, MongoResourceSetRepository, MongoStudyPlanRepository};
pub use rate_limit::{FixedWindowLimiter, RateLimitConfig};
