//! TogglePin command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Pin or unpin a workspace for the caller only
#[operation(
    verb = "toggle",
    noun = "pin",
    description = "Pin or unpin a workspace in the caller's list"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TogglePin {
    /// Workspace to pin or unpin
    pub workspace_id: WorkspaceId,
}

impl TogglePin {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for TogglePin {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for TogglePin {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let pinned = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                workspaces::toggle_pin(conn, &self.workspace_id, user, now)
            })?;
            Ok(serde_json::json!({
                "workspace_id": self.workspace_id,
                "pinned": pinned,
            }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
