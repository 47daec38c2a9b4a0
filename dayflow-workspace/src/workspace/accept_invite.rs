//! AcceptInvite command

use super::snapshot;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Join the workspace an invite token belongs to
///
/// Accepting twice, or as the owner, leaves membership unchanged.
#[operation(
    verb = "accept",
    noun = "invite",
    description = "Join a workspace with an invite token"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcceptInvite {
    /// Invite token from the link
    pub token: String,
}

impl AcceptInvite {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Mutation for AcceptInvite {
    fn target(&self) -> MutationTarget {
        MutationTarget::Global
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AcceptInvite {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let token = self.token.trim();
            let board = ctx.write(|conn| {
                let workspace = workspaces::find_by_invite_token(conn, token)?
                    .filter(|_| !token.is_empty())
                    .ok_or_else(|| WorkspaceError::not_found("invite", "token"))?;
                if workspace.owner_id != *user
                    && workspaces::add_member(conn, &workspace.id, user, now)?
                {
                    info!(workspace_id = %workspace.id, member = %user, "joined workspace");
                }
                snapshot(conn, &ctx.locks(conn), &workspace, user)
            })?;
            Ok(serde_json::to_value(board)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
