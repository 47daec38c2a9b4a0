//! AcquireLock command

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

/// Take the editing lock of a workspace, or refresh it if already held
#[operation(
    verb = "acquire",
    noun = "lock",
    description = "Take the editing lock of a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcquireLock {
    /// Workspace to edit
    pub workspace_id: WorkspaceId,
}

impl AcquireLock {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for AcquireLock {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AcquireLock {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let status = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let locks = ctx.locks(conn);
                if !locks.acquire(&self.workspace_id, user)? {
                    let holder = workspaces::get(conn, &self.workspace_id)?
                        .and_then(|ws| locks.state(&ws).live_holder().cloned());
                    return Err(WorkspaceError::LockConflict {
                        workspace_id: self.workspace_id.clone(),
                        holder,
                    });
                }
                locks.status(&self.workspace_id, user)
            })?;
            info!(workspace_id = %self.workspace_id, %user, "editing lock acquired");
            Ok(serde_json::to_value(status)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
