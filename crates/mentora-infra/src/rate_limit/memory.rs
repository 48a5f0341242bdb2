//! In-memory keyed rate limiter with fixed-window counters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use mentora_core::ports::{Clock, RateLimitDecision, RateLimiter, SystemClock};

/// Fixed-window limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window and key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct Window {
    count: u32,
    started_at: Instant,
}

/// Keyed fixed-window rate limiter.
///
/// Each key owns a `(count, window_start)` pair; the counter resets once the
/// window has fully elapsed. Limits are per-process, not distributed across
/// instances.
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build with an injected clock. Tests drive this with a manual clock.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            windows: DashMap::new(),
        }
    }

    /// Drop entries whose window has fully elapsed. Callers may run this
    /// periodically to keep the map from growing with one-shot clients.
    pub fn cleanup(&self) {
        let now = self.clock.now();
        let window = self.config.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < window);
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn admit(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window {
                count: 0,
                started_at: now,
            });
        let window = entry.value_mut();

        if now.duration_since(window.started_at) >= self.config.window {
            window.count = 0;
            window.started_at = now;
        }

        let elapsed = now.duration_since(window.started_at);
        let reset_after = self.config.window.saturating_sub(elapsed);

        if window.count < self.config.max_requests {
            window.count += 1;
            RateLimitDecision {
                allowed: true,
                limit: self.config.max_requests,
                remaining: self.config.max_requests - window.count,
                reset_after,
            }
        } else {
            RateLimitDecision {
                allowed: false,
                limit: self.config.max_requests,
                remaining: 0,
                reset_after,
            }
        }
    }
}
