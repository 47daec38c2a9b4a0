//! DeleteTool command

use super::require_tool;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::tools;
use crate::types::ToolId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[operation(verb = "delete", noun = "tool", description = "Delete a tool")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteTool {
    /// Tool to delete
    pub tool_id: ToolId,
}

impl DeleteTool {
    pub fn new(tool_id: impl Into<ToolId>) -> Self {
        Self {
            tool_id: tool_id.into(),
        }
    }
}

impl Mutation for DeleteTool {
    fn target(&self) -> MutationTarget {
        MutationTarget::Tool(self.tool_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteTool {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            ctx.write(|conn| {
                let tool = require_tool(conn, &self.tool_id, user)?;
                tools::delete(conn, &tool.id)
            })?;
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.tool_id,
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
    use crate::tool::AddTool;

    #[tokio::test]
    async fn test_delete_tool() {
        let bed = setup().await;
        let tool = AddTool::new("x")
            .in_workspace(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let id = tool["id"].as_str().unwrap();

        DeleteTool::new(id).execute(&bed.alice).await.into_result().unwrap();
        let again = DeleteTool::new(id).execute(&bed.alice).await.into_result();
        assert!(matches!(again, Err(WorkspaceError::NotFound { .. })));
    }
}
