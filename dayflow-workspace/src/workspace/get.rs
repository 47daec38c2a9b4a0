//! GetWorkspace command

use super::snapshot;
use crate::access;
use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// Board snapshot: columns with cards, backlog, tools, people and the lease
#[operation(
    verb = "get",
    noun = "workspace",
    description = "Retrieve a workspace with its columns, cards and collaborators"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetWorkspace {
    /// Workspace to fetch
    pub workspace_id: WorkspaceId,
}

impl GetWorkspace {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for GetWorkspace {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let board = ctx.db().read(|conn| {
                let workspace = access::require_access(conn, &self.workspace_id, user)?;
                snapshot(conn, &ctx.locks(conn), &workspace, user)
            })?;
            Ok(serde_json::to_value(board)?)
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::workspaces;
    use crate::test_support::setup;
    use chrono::Duration;

    #[tokio::test]
    async fn test_snapshot_shows_lease_for_viewer() {
        let bed = setup().await;
        bed.join_as_bob().await;
        bed.lock_for(&bed.alice_id);

        let mine = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(mine["editing_by"], "alice");
        assert_eq!(mine["is_editing_by_me"], true);
        assert_eq!(mine["editing_user"]["display_name"], "alice");

        let theirs = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result()
            .unwrap();
        assert_eq!(theirs["editing_by"], "alice");
        assert_eq!(theirs["is_editing_by_me"], false);
        assert_eq!(theirs["members"][0]["id"], "bob");
        assert_eq!(theirs["owner"]["id"], "alice");
    }

    #[tokio::test]
    async fn test_expired_lease_reads_as_free() {
        let bed = setup().await;
        bed.lock_for(&bed.alice_id);
        bed.clock.advance(Duration::seconds(61));

        let result = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert!(result["editing_by"].is_null());
        assert!(result["editing_user"].is_null());
        assert_eq!(result["is_editing_by_me"], false);
    }

    #[tokio::test]
    async fn test_invite_token_only_for_owner() {
        let bed = setup().await;
        bed.join_as_bob().await;
        bed.ctx
            .db()
            .write(|conn| workspaces::set_invite_token(conn, &bed.workspace, "secret"))
            .unwrap();

        let owner_view = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(owner_view["invite_token"], "secret");

        let member_view = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result()
            .unwrap();
        assert!(member_view.get("invite_token").is_none());
    }

    #[tokio::test]
    async fn test_outsider_sees_not_found() {
        let bed = setup().await;
        let result = GetWorkspace::new(bed.workspace.clone())
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
