//! ReorderColumns command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::Container;
use crate::store::{columns, workspaces};
use crate::types::{ColumnId, WorkspaceId};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Put a workspace's columns in the given order
///
/// Columns not listed keep their relative order after the listed ones.
#[operation(
    verb = "reorder",
    noun = "columns",
    description = "Set the order of a workspace's columns"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderColumns {
    /// Workspace whose columns are reordered
    pub workspace_id: WorkspaceId,
    /// Columns in their new order; unlisted columns follow
    pub column_ids: Vec<ColumnId>,
}

impl ReorderColumns {
    pub fn new(workspace_id: impl Into<WorkspaceId>, column_ids: Vec<ColumnId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            column_ids,
        }
    }
}

impl Mutation for ReorderColumns {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ReorderColumns {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let listed: Vec<String> = self.column_ids.iter().map(|id| id.to_string()).collect();
            let columns = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let written =
                    Container::Columns(self.workspace_id.clone()).reorder_explicit(conn, &listed)?;
                if written > 0 {
                    workspaces::touch(conn, &self.workspace_id, now)?;
                }
                columns::list_in_workspace(conn, &self.workspace_id)
            })?;
            Ok(serde_json::json!({ "columns": columns }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
