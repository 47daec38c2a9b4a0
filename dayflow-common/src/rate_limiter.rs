//! Rate limiting for request handling
//!
//! A GCRA token bucket per key (user id or client address), built on the
//! `governor` crate. The store is an explicit value owned by whoever handles
//! requests: a key's bucket is created on first use, and buckets that have
//! refilled completely are dropped by [`KeyedRateLimiter::retain_recent`],
//! which also runs on its own every few thousand checks.

use dashmap::DashMap;
use governor::clock::{Clock, DefaultClock};
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Default window length
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default number of requests allowed per key and window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Checks between two sweeps of stale keys
pub const DEFAULT_SWEEP_EVERY: u64 = 4096;

/// Configuration for the limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Time over which a full budget refills
    pub window: Duration,
    /// Requests allowed per key in one window
    pub max_requests: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

impl RateLimiterConfig {
    /// `max_requests` at once, then one more every `window / max_requests`
    pub fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(nonzero!(1u32));
        Quota::with_period(self.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Returned by [`KeyedRateLimiter::check`] when a key is over its budget
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("too many requests for '{key}', retry after {retry_after:?}")]
pub struct RateLimitExceeded {
    pub key: String,
    pub retry_after: Duration,
}

type KeyedBuckets = RateLimiter<String, DashMap<String, InMemoryState>, DefaultClock>;

/// Per-key request limiter
pub struct KeyedRateLimiter {
    buckets: KeyedBuckets,
    clock: DefaultClock,
    config: RateLimiterConfig,
    checks: AtomicU64,
    sweep_every: u64,
}

impl KeyedRateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            buckets: RateLimiter::keyed(config.quota()),
            clock: DefaultClock::default(),
            config,
            checks: AtomicU64::new(0),
            sweep_every: DEFAULT_SWEEP_EVERY,
        }
    }

    /// Sweep stale keys every `checks` calls to [`check`](Self::check)
    pub fn with_sweep_every(mut self, checks: u64) -> Self {
        self.sweep_every = checks.max(1);
        self
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Spend one request from `key`'s budget
    pub fn check(&self, key: &str) -> Result<(), RateLimitExceeded> {
        let outcome = self.buckets.check_key(&key.to_string());

        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % self.sweep_every == 0 {
            self.retain_recent();
        }

        outcome.map_err(|not_until| {
            let retry_after = not_until.wait_time_from(self.clock.now());
            tracing::warn!(key, ?retry_after, "rate limit exceeded");
            RateLimitExceeded {
                key: key.to_string(),
                retry_after,
            }
        })
    }

    /// Drop keys whose budget has fully refilled. Returns how many were removed.
    pub fn retain_recent(&self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain_recent();
        self.buckets.shrink_to_fit();
        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            tracing::debug!(removed, "dropped idle rate limit keys");
        }
        removed
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for KeyedRateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

impl fmt::Debug for KeyedRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedRateLimiter")
            .field("config", &self.config)
            .field("tracked_keys", &self.tracked_keys())
            .field("sweep_every", &self.sweep_every)
            .finish()
    }
}
