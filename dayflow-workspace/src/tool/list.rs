//! ListTools command

use crate::access;
use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::store::tools;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// Tools of a workspace, or of the caller's hub without one; newest first
#[operation(verb = "list", noun = "tools", description = "List tools, newest first")]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListTools {
    /// Workspace to list; `None` lists the hub
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
}

impl ListTools {
    pub fn hub() -> Self {
        Self::default()
    }

    pub fn in_workspace(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
        }
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ListTools {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let tools = ctx.db().read(|conn| match &self.workspace_id {
                Some(workspace_id) => {
                    access::require_access(conn, workspace_id, user)?;
                    tools::list_in_workspace(conn, workspace_id)
                }
                None => tools::list_hub(conn, user),
            })?;
            Ok(serde_json::json!({
                "count": tools.len(),
                "tools": tools,
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
    use crate::tool::AddTool;
    use chrono::Duration;

    #[tokio::test]
    async fn test_lists_newest_first_and_separates_hub() {
        let bed = setup().await;
        for title in ["old", "new"] {
            bed.clock.advance(Duration::seconds(1));
            AddTool::new(title)
                .in_workspace(bed.workspace.clone())
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
        }
        AddTool::new("personal").execute(&bed.alice).await.into_result().unwrap();

        let listed = ListTools::in_workspace(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed["count"], 2);
        assert_eq!(listed["tools"][0]["title"], "new");

        let hub = ListTools::hub().execute(&bed.alice).await.into_result().unwrap();
        assert_eq!(hub["count"], 1);
        assert_eq!(hub["tools"][0]["title"], "personal");
    }
}
