//! TransferLock command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::types::{UserId, WorkspaceId};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Hand the editing lock to another collaborator
#[operation(
    verb = "transfer",
    noun = "lock",
    description = "Hand the editing lock to another collaborator"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferLock {
    /// Workspace being edited
    pub workspace_id: WorkspaceId,
    /// Collaborator who takes over
    pub to_user_id: UserId,
}

impl TransferLock {
    pub fn new(workspace_id: impl Into<WorkspaceId>, to_user_id: impl Into<UserId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            to_user_id: to_user_id.into(),
        }
    }
}

impl Mutation for TransferLock {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for TransferLock {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let status = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let locks = ctx.locks(conn);
                locks.assert_held(&self.workspace_id, user)?;

                if !access::has_access(conn, &self.workspace_id, &self.to_user_id)? {
                    return Err(WorkspaceError::invalid_target(format!(
                        "{} cannot edit this workspace",
                        self.to_user_id
                    )));
                }
                if !locks.transfer(&self.workspace_id, user, &self.to_user_id)? {
                    // Lost the lease between the check and the update
                    locks.assert_held(&self.workspace_id, user)?;
                }
                locks.status(&self.workspace_id, user)
            })?;
            info!(
                workspace_id = %self.workspace_id,
                from = %user,
                to = %self.to_user_id,
                "editing lock transferred"
            );
            Ok(serde_json::to_value(status)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
