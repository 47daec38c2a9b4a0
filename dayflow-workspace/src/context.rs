//! WorkspaceContext and RequestContext

use crate::access;
use crate::db::Database;
use crate::error::{Result, WorkspaceError};
use crate::lock::LockManager;
use crate::types::{UserId, WorkspaceId};
use chrono::{DateTime, Duration, Utc};
use dayflow_common::{Clock, KeyedRateLimiter, SystemClock};
use dayflow_config::{DayflowConfig, LimitsConfig};
use rusqlite::Connection;
use std::sync::Arc;

/// Shared state for every request: storage, configuration, time and rate limits
#[derive(Debug)]
pub struct WorkspaceContext {
    db: Database,
    config: DayflowConfig,
    clock: Arc<dyn Clock>,
    rate_limiter: KeyedRateLimiter,
}

impl WorkspaceContext {
    /// Create a context reading the system clock
    pub fn new(db: Database, config: DayflowConfig) -> Self {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    /// Create a context with an explicit clock (tests move time by hand)
    pub fn with_clock(db: Database, config: DayflowConfig, clock: Arc<dyn Clock>) -> Self {
        let rate_limiter = KeyedRateLimiter::new(config.rate_limit.to_limiter_config());
        Self {
            db,
            config,
            clock,
            rate_limiter,
        }
    }

    /// Open the database named by the configuration, in memory when it names none
    pub fn open(config: DayflowConfig) -> Result<Self> {
        let db = match &config.database.path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        tracing::info!(path = ?config.database.path, "opened workspace database");
        Ok(Self::new(db, config))
    }

    /// Load configuration from the default sources and open the database
    pub fn from_default_config() -> Result<Self> {
        Self::open(dayflow_config::load_configuration()?)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &DayflowConfig {
        &self.config
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.config.limits
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn rate_limiter(&self) -> &KeyedRateLimiter {
        &self.rate_limiter
    }

    /// How long a lease lives without a refresh
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_std(self.config.lock.timeout()).unwrap_or_else(|_| Duration::seconds(60))
    }

    /// Lock manager over `conn`, evaluated at the current time
    pub fn locks<'c>(&self, conn: &'c Connection) -> LockManager<'c> {
        LockManager::new(conn, self.now(), self.lock_timeout())
    }
}

/// One request: the shared context plus the caller, if authenticated
#[derive(Debug, Clone)]
pub struct RequestContext {
    workspace: Arc<WorkspaceContext>,
    user: Option<UserId>,
    /// Workspace whose lease every write of this request must still hold
    lease_scope: Option<WorkspaceId>,
}

impl RequestContext {
    pub fn new(workspace: Arc<WorkspaceContext>, user: Option<UserId>) -> Self {
        Self {
            workspace,
            user,
            lease_scope: None,
        }
    }

    /// A request made on behalf of `user`
    pub fn authenticated(workspace: Arc<WorkspaceContext>, user: UserId) -> Self {
        Self::new(workspace, Some(user))
    }

    /// A request with no signed-in user
    pub fn anonymous(workspace: Arc<WorkspaceContext>) -> Self {
        Self::new(workspace, None)
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// The caller, or `Unauthenticated`
    pub fn require_user(&self) -> Result<&UserId> {
        self.user.as_ref().ok_or(WorkspaceError::Unauthenticated)
    }

    pub fn workspace(&self) -> &Arc<WorkspaceContext> {
        &self.workspace
    }

    /// The same request, with writes bound to the caller's lease on `workspace_id`
    pub fn within_lease(&self, workspace_id: WorkspaceId) -> Self {
        Self {
            lease_scope: Some(workspace_id),
            ..self.clone()
        }
    }

    pub fn lease_scope(&self) -> Option<&WorkspaceId> {
        self.lease_scope.as_ref()
    }

    /// Run `f` in a write transaction
    ///
    /// Within a lease scope the caller's access and live lease are asserted
    /// first, in the same transaction, so a lease lost after the middleware
    /// ran cannot let the write through.
    pub fn write<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.db().write(|conn| {
            if let Some(workspace_id) = &self.lease_scope {
                let user = self.require_user()?;
                access::require_access(conn, workspace_id, user)?;
                self.locks(conn).assert_held(workspace_id, user)?;
            }
            f(conn)
        })
    }

    /// Key used for rate limiting this caller
    pub fn rate_limit_key(&self) -> String {
        match &self.user {
            Some(user) => format!("user:{user}"),
            None => "anonymous".to_string(),
        }
    }
}

impl std::ops::Deref for RequestContext {
    type Target = WorkspaceContext;

    fn deref(&self) -> &WorkspaceContext {
        &self.workspace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user() {
        let ctx = Arc::new(WorkspaceContext::open(DayflowConfig::default()).unwrap());
        let anonymous = RequestContext::anonymous(ctx.clone());
        assert!(matches!(
            anonymous.require_user(),
            Err(WorkspaceError::Unauthenticated)
        ));
        assert_eq!(anonymous.rate_limit_key(), "anonymous");

        let signed_in = RequestContext::authenticated(ctx, UserId::from("u1"));
        assert_eq!(signed_in.require_user().unwrap().as_str(), "u1");
        assert_eq!(signed_in.rate_limit_key(), "user:u1");
    }

    #[test]
    fn test_lock_timeout_follows_config() {
        let mut config = DayflowConfig::default();
        config.lock.timeout_secs = 90;
        config.lock.heartbeat_interval_secs = 30;
        let ctx = WorkspaceContext::open(config).unwrap();
        assert_eq!(ctx.lock_timeout(), Duration::seconds(90));
    }
}
