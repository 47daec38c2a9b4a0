//! DeleteColumn command

use super::require_column;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::Container;
use crate::store::{columns, workspaces};
use crate::types::ColumnId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Delete a column and the cards in it; the remaining columns close up
#[operation(
    verb = "delete",
    noun = "column",
    description = "Delete a column together with its cards"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// Column to delete
    pub column_id: ColumnId,
}

impl DeleteColumn {
    pub fn new(column_id: impl Into<ColumnId>) -> Self {
        Self {
            column_id: column_id.into(),
        }
    }
}

impl Mutation for DeleteColumn {
    fn target(&self) -> MutationTarget {
        MutationTarget::Column(self.column_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteColumn {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let cards_deleted = ctx.write(|conn| {
                let column = require_column(conn, &self.column_id, user)?;
                let cards = Container::Column(column.id.clone()).len(conn)?;
                columns::delete(conn, &column.id)?;
                Container::Columns(column.workspace_id.clone()).compact(conn)?;
                workspaces::touch(conn, &column.workspace_id, now)?;
                Ok(cards)
            })?;
            debug!(column_id = %self.column_id, cards_deleted, "deleted column");
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.column_id,
                "cards_deleted": cards_deleted,
            }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
