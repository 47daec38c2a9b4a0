//! # Dayflow Common
//!
//! Foundational pieces shared by the dayflow crates.
//!
//! ## Modules
//!
//! - [`clock`] - Wall-clock abstraction so lease expiry is testable
//! - [`ids`] - Identifier and token generation
//! - [`rate_limiter`] - Keyed token-bucket request limiter with explicit lifecycle
//! - [`logging`] - Formatting helpers for tracing output

pub mod clock;
pub mod ids;
pub mod logging;
pub mod rate_limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{new_id, new_token};
pub use logging::Pretty;
pub use rate_limiter::{
    KeyedRateLimiter, RateLimitExceeded, RateLimiterConfig, DEFAULT_MAX_REQUESTS,
    DEFAULT_SWEEP_EVERY, DEFAULT_WINDOW,
};
