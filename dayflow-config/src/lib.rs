//! Dayflow configuration management using Figment
//!
//! Configuration is merged from defaults, `dayflow.{toml,yaml,yml,json}` files in
//! the config directory (`./.dayflow/` unless another directory is given) and
//! `DAYFLOW_`-prefixed environment variables, then validated.
//!
//! ```no_run
//! use dayflow_config::ConfigProvider;
//!
//! let config = ConfigProvider::new().load()?;
//! println!("lease timeout: {:?}", config.lock.timeout());
//! # Ok::<(), dayflow_config::ConfigError>(())
//! ```
//!
//! ## Example TOML configuration
//!
//! ```toml
//! [lock]
//! timeout_secs = 60
//! heartbeat_interval_secs = 20
//!
//! [limits]
//! max_columns_per_workspace = 20
//! max_cards_per_user = 500
//!
//! [database]
//! path = "dayflow.db"
//! ```

pub mod error;
pub mod provider;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, CONFIG_DIR_NAME, ENV_PREFIX};
pub use types::{
    DatabaseConfig, DayflowConfig, LimitsConfig, LockConfig, RateLimitConfig,
    DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_LOCK_TIMEOUT_SECS,
};

/// Load configuration from the default sources
pub fn load_configuration() -> ConfigResult<DayflowConfig> {
    ConfigProvider::new().load()
}
