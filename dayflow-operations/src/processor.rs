//! Operation processor trait

use crate::{Execute, Operation};
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations against a context and takes care of their log entries.
///
/// Implementations decide where log entries go (database table, file, nowhere)
/// and may add cross-cutting checks before delegating to `Execute`.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute an operation, persisting its log entry if it produced one
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + Operation + Send + Sync;
}
