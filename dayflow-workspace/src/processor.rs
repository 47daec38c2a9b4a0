//! WorkspaceOperationProcessor
//!
//! Entry point for running commands: rate-limits the caller, sends mutations
//! through the [`LockMiddleware`], and persists the log entry of every
//! successful mutation to the activity table.

use crate::context::RequestContext;
use crate::dispatch::{LockMiddleware, Mutation};
use crate::error::{Result, WorkspaceError};
use crate::store::activity;
use dayflow_operations::{async_trait, Execute, Operation, OperationProcessor, Value};
use dayflow_common::Pretty;
use tracing::{debug, trace, warn};

/// Runs workspace commands
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceOperationProcessor {
    middleware: LockMiddleware,
}

impl WorkspaceOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different lock middleware (e.g. another exemption predicate)
    pub fn with_middleware(middleware: LockMiddleware) -> Self {
        Self { middleware }
    }

    /// Run a state-changing command behind the lock middleware
    pub async fn mutate<M: Mutation>(&self, mutation: &M, ctx: &RequestContext) -> Result<Value> {
        let guarded = self.middleware.wrap(mutation);
        self.process(&guarded, ctx).await
    }

    /// Run a read-only command
    pub async fn query<Q>(&self, query: &Q, ctx: &RequestContext) -> Result<Value>
    where
        Q: Execute<RequestContext, WorkspaceError> + Operation + Send + Sync,
    {
        self.process(query, ctx).await
    }
}

#[async_trait]
impl OperationProcessor<RequestContext, WorkspaceError> for WorkspaceOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &RequestContext) -> Result<Value>
    where
        O: Execute<RequestContext, WorkspaceError> + Operation + Send + Sync,
    {
        let op = operation.op_string();
        ctx.rate_limiter().check(&ctx.rate_limit_key())?;

        debug!(%op, user = ?ctx.user(), "processing operation");
        let (result, log_entry) = operation.execute(ctx).await.split();

        match (&result, log_entry) {
            (Ok(_), Some(entry)) => {
                let entry = match ctx.user() {
                    Some(user) => entry.with_actor(user.as_str()),
                    None => entry,
                };
                trace!(entry = %Pretty(&entry), "recording activity");
                ctx.db().write(|conn| activity::append(conn, &entry))?;
            }
            (Err(error), _) => {
                warn!(%op, %error, "operation failed");
            }
            (Ok(_), None) => {}
        }

        result
    }
}
