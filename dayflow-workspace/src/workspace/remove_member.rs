//! RemoveMember command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use crate::types::{UserId, WorkspaceId};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Remove a member from a workspace
///
/// The owner may remove anyone; a member may only remove themself. A removed
/// member who holds the editing lock loses it.
#[operation(
    verb = "remove",
    noun = "member",
    description = "Remove a member from a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoveMember {
    /// Workspace to leave or remove from
    pub workspace_id: WorkspaceId,
    /// Member being removed
    pub user_id: UserId,
}

impl RemoveMember {
    pub fn new(workspace_id: impl Into<WorkspaceId>, user_id: impl Into<UserId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl Mutation for RemoveMember {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for RemoveMember {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let lease_cleared = ctx.write(|conn| {
                let workspace = access::require_access(conn, &self.workspace_id, user)?;
                if workspace.owner_id == self.user_id {
                    return Err(WorkspaceError::invalid_target("the owner cannot be removed"));
                }
                if workspace.owner_id != *user && self.user_id != *user {
                    return Err(WorkspaceError::forbidden(
                        "only the workspace owner can remove other members",
                    ));
                }
                if !workspaces::remove_member(conn, &self.workspace_id, &self.user_id)? {
                    return Err(WorkspaceError::not_found("member", &self.user_id));
                }
                ctx.locks(conn).release(&self.workspace_id, &self.user_id)
            })?;
            info!(
                workspace_id = %self.workspace_id,
                member = %self.user_id,
                lease_cleared,
                "removed member"
            );
            Ok(serde_json::json!({
                "removed": true,
                "workspace_id": self.workspace_id,
                "user_id": self.user_id,
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
    async fn test_owner_removes_member_holding_lease() {
        let bed = setup().await;
        bed.join_as_bob().await;
        bed.lock_for(&bed.bob_id);

        RemoveMember::new(bed.workspace.clone(), bed.bob_id.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        let (has, workspace) = bed
            .ctx
            .db()
            .read(|conn| {
                Ok((
                    access::has_access(conn, &bed.workspace, &bed.bob_id)?,
                    workspaces::get(conn, &bed.workspace)?,
                ))
            })
            .unwrap();
        assert!(!has);
        assert!(workspace.unwrap().editing_by.is_none());
    }

    #[tokio::test]
    async fn test_member_can_leave() {
        let bed = setup().await;
        bed.join_as_bob().await;
        let result = RemoveMember::new(bed.workspace.clone(), bed.bob_id.clone())
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_member_cannot_remove_others() {
        let bed = setup().await;
        bed.join_as_bob().await;
        let now = bed.ctx.now();
        let carol = crate::types::User {
            id: UserId::from("carol"),
            email: "carol@example.com".into(),
            display_name: "carol".into(),
            avatar_url: None,
            created_at: now,
        };
        bed.ctx
            .db()
            .write(|conn| {
                crate::store::users::insert(conn, &carol)?;
                workspaces::add_member(conn, &bed.workspace, &carol.id, now)
            })
            .unwrap();

        let result = RemoveMember::new(bed.workspace.clone(), carol.id.clone())
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_owner_cannot_be_removed() {
        let bed = setup().await;
        let result = RemoveMember::new(bed.workspace.clone(), bed.alice_id.clone())
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::InvalidTarget { .. })));
    }
}
