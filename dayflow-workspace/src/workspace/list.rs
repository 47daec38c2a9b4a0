//! ListWorkspaces command

use super::summarize;
use crate::context::RequestContext;
use crate::error::{Result, WorkspaceError};
use crate::store::workspaces;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// Workspaces the caller owns or belongs to: pinned first, then newest first
#[operation(
    verb = "list",
    noun = "workspaces",
    description = "List the caller's workspaces"
)]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListWorkspaces;

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ListWorkspaces {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let mut summaries = ctx.db().read(|conn| {
                let locks = ctx.locks(conn);
                workspaces::list_for_user(conn, user)?
                    .iter()
                    .map(|workspace| summarize(conn, &locks, workspace, user))
                    .collect::<Result<Vec<_>>>()
            })?;
            summaries.sort_by_key(|summary| !summary.pinned);
            Ok(serde_json::json!({
                "workspaces": summaries,
                "count": summaries.len(),
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use crate::workspace::{CreateWorkspace, TogglePin};
    use chrono::Duration;

    #[tokio::test]
    async fn test_pinned_first_then_newest() {
        let bed = setup().await;
        for title in ["First", "Second"] {
            bed.clock.advance(Duration::seconds(1));
            CreateWorkspace::new(title)
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
        }
        TogglePin::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        let result = ListWorkspaces.execute(&bed.alice).await.into_result().unwrap();
        let titles: Vec<&str> = result["workspaces"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Board", "Second", "First"]);
        assert_eq!(result["workspaces"][0]["pinned"], true);
    }

    #[tokio::test]
    async fn test_members_see_shared_workspace() {
        let bed = setup().await;
        let before = ListWorkspaces.execute(&bed.bob).await.into_result().unwrap();
        assert_eq!(before["count"], 0);

        bed.join_as_bob().await;
        let after = ListWorkspaces.execute(&bed.bob).await.into_result().unwrap();
        assert_eq!(after["count"], 1);
        assert_eq!(after["workspaces"][0]["is_owner"], false);
    }
}
