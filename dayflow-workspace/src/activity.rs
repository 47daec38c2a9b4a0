//! ListActivity command

use crate::access;
use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::store::activity;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// Entries returned when no limit is given
pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;

/// Recent successful mutations of a workspace, newest first
#[operation(
    verb = "list",
    noun = "activity",
    description = "List recent changes to a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListActivity {
    /// Workspace whose feed to read
    pub workspace_id: WorkspaceId,
    /// Maximum entries to return
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListActivity {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ListActivity {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let limit = self.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
            let entries = ctx.db().read(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                activity::list_for_workspace(conn, &self.workspace_id, limit)
            })?;
            Ok(serde_json::json!({
                "count": entries.len(),
                "entries": entries,
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}
