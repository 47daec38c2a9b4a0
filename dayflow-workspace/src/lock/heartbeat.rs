//! HeartbeatLock command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keep a held lock alive. Callers who are not the recorded holder get the
/// current status back unchanged.
#[operation(
    verb = "heartbeat",
    noun = "lock",
    description = "Refresh the editing lock while still editing"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeartbeatLock {
    /// Workspace being edited
    pub workspace_id: WorkspaceId,
}

impl HeartbeatLock {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for HeartbeatLock {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for HeartbeatLock {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let status = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let locks = ctx.locks(conn);
                let refreshed = locks.heartbeat(&self.workspace_id, user)?;
                debug!(workspace_id = %self.workspace_id, %user, refreshed, "heartbeat");
                locks.status(&self.workspace_id, user)
            })?;
            Ok(serde_json::to_value(status)?)
        }
        .await;

        // Heartbeats arrive every few seconds; keep them out of the activity log
        ExecutionResult::unlogged(result)
    }
}
