//! Rate limiting port.

use std::time::{Duration, Instant};

/// Clock abstraction so limiters can be driven by a manual clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock backed implementation used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Maximum requests per window for this limiter scope.
    pub limit: u32,
    /// Requests left in the current window (0 when rejected).
    pub remaining: u32,
    /// Time until the current window rolls over.
    pub reset_after: Duration,
}

/// Rate limiter trait - one instance per admission-control scope.
///
/// `admit` both records the request and decides: a rejected request still
/// counts against nothing (the window is already full), an admitted one
/// consumes a slot. The check is synchronous; state lives in memory.
pub trait RateLimiter: Send + Sync {
    fn admit(&self, key: &str) -> RateLimitDecision;
}
