//! DeleteWorkspace command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Delete a workspace with everything in it. Only the owner may do this.
#[operation(
    verb = "delete",
    noun = "workspace",
    description = "Delete a workspace and everything in it"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteWorkspace {
    /// Workspace to delete
    pub workspace_id: WorkspaceId,
}

impl DeleteWorkspace {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for DeleteWorkspace {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteWorkspace {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            ctx.write(|conn| {
                access::require_owner(conn, &self.workspace_id, user, "delete the workspace")?;
                workspaces::delete(conn, &self.workspace_id)
            })?;
            info!(workspace_id = %self.workspace_id, "deleted workspace");
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.workspace_id,
            }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
