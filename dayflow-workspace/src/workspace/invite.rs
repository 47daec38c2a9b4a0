//! GenerateInvite command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use crate::types::WorkspaceId;
use dayflow_common::new_token;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Issue a fresh invite token; any previous token stops working
#[operation(
    verb = "generate",
    noun = "invite",
    description = "Create a new invite token for a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateInvite {
    /// Workspace to share
    pub workspace_id: WorkspaceId,
}

impl GenerateInvite {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

impl Mutation for GenerateInvite {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for GenerateInvite {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let token = new_token();
            ctx.write(|conn| {
                access::require_owner(conn, &self.workspace_id, user, "invite collaborators")?;
                workspaces::set_invite_token(conn, &self.workspace_id, &token)
            })?;
            info!(workspace_id = %self.workspace_id, "generated invite token");
            Ok(serde_json::json!({
                "workspace_id": self.workspace_id,
                "invite_token": token,
            }))
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
    async fn test_new_token_replaces_old() {
        let bed = setup().await;
        let first = GenerateInvite::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let second = GenerateInvite::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_ne!(first["invite_token"], second["invite_token"]);

        let old = first["invite_token"].as_str().unwrap().to_string();
        let found = bed
            .ctx
            .db()
            .read(|conn| workspaces::find_by_invite_token(conn, &old))
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_member_cannot_invite() {
        let bed = setup().await;
        bed.join_as_bob().await;
        let result = GenerateInvite::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::Forbidden { .. })));
    }
}
