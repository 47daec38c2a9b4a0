//! ReleaseLock command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Give up the editing lock. Releasing a lock someone else holds changes nothing.
#[operation(
    verb = "release",
    noun = "lock",
    description = "Give up the editing lock of a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseLock {
    /// Workspace to stop editing
    pub workspace_id: WorkspaceId,
}

impl ReleaseLock {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for ReleaseLock {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ReleaseLock {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let (released, status) = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let locks = ctx.locks(conn);
                let released = locks.release(&self.workspace_id, user)?;
                Ok((released, locks.status(&self.workspace_id, user)?))
            })?;
            if released {
                info!(workspace_id = %self.workspace_id, %user, "editing lock released");
            }
            Ok(serde_json::to_value(status)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;

    #[tokio::test]
    async fn test_release_clears_lease() {
        let bed = setup().await;
        bed.lock_for(&bed.alice_id);

        let result = ReleaseLock::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert!(result["editing_by"].is_null());
        assert_eq!(result["is_editing_by_me"], false);
    }

    #[tokio::test]
    async fn test_release_by_non_holder_is_noop() {
        let bed = setup().await;
        bed.join_as_bob().await;
        bed.lock_for(&bed.alice_id);

        let result = ReleaseLock::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["editing_by"], bed.alice_id.as_str());
    }

    #[tokio::test]
    async fn test_release_without_lease_succeeds() {
        let bed = setup().await;
        let result = ReleaseLock::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_release_requires_access() {
        let bed = setup().await;
        let result = ReleaseLock::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
