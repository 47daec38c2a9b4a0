//! Typed configuration values

use crate::error::{ConfigError, ConfigResult};
use dayflow_common::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default lease timeout in seconds
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 60;

/// Default client heartbeat interval in seconds
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 20;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayflowConfig {
    pub lock: LockConfig,
    pub limits: LimitsConfig,
    pub rate_limit: RateLimitConfig,
    pub database: DatabaseConfig,
}

impl DayflowConfig {
    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lock.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "lock.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.lock.heartbeat_interval_secs == 0
            || self.lock.heartbeat_interval_secs >= self.lock.timeout_secs
        {
            return Err(ConfigError::invalid_value(
                "lock.heartbeat_interval_secs",
                format!(
                    "must be between 1 and {} (exclusive of the lock timeout)",
                    self.lock.timeout_secs
                ),
            ));
        }

        let limits = [
            (
                "limits.max_columns_per_workspace",
                self.limits.max_columns_per_workspace,
            ),
            ("limits.max_cards_per_user", self.limits.max_cards_per_user),
            (
                "limits.max_tools_per_workspace",
                self.limits.max_tools_per_workspace,
            ),
            ("limits.max_roadmap_nodes", self.limits.max_roadmap_nodes),
            ("limits.max_title_length", self.limits.max_title_length),
            ("rate_limit.max_requests", self.rate_limit.max_requests),
        ];
        for (key, value) in limits {
            if value == 0 {
                return Err(ConfigError::invalid_value(key, "must be greater than zero"));
            }
        }

        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::invalid_value(
                "rate_limit.window_secs",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Editing lease settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// A lease not refreshed within this many seconds is expired
    pub timeout_secs: u64,
    /// How often clients are expected to heartbeat
    pub heartbeat_interval_secs: u64,
}

impl LockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
        }
    }
}

/// Per-entity creation limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_columns_per_workspace: u32,
    pub max_cards_per_user: u32,
    pub max_tools_per_workspace: u32,
    pub max_roadmap_nodes: u32,
    pub max_title_length: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_columns_per_workspace: 20,
            max_cards_per_user: 500,
            max_tools_per_workspace: 50,
            max_roadmap_nodes: 200,
            max_title_length: 191,
        }
    }
}

/// Request rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn to_limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            window: Duration::from_secs(self.window_secs),
            max_requests: self.max_requests,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let limiter = RateLimiterConfig::default();
        Self {
            window_secs: limiter.window.as_secs(),
            max_requests: limiter.max_requests,
        }
    }
}

/// Database location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path. `None` keeps the database in memory.
    pub path: Option<PathBuf>,
}
