//! UpdateColumn command

use super::require_column;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{columns, workspaces};
use crate::types::ColumnId;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Change a column's title, completed-card visibility or color
#[operation(
    verb = "update",
    noun = "column",
    description = "Change a column's title, visibility of done cards or color"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// Column to edit
    pub column_id: ColumnId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New visibility of done cards
    #[serde(default)]
    pub hide_completed: Option<bool>,
    /// New display color
    #[serde(default)]
    pub color: Option<String>,
}

impl UpdateColumn {
    pub fn new(column_id: impl Into<ColumnId>) -> Self {
        Self {
            column_id: column_id.into(),
            title: None,
            hide_completed: None,
            color: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = Some(hide);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Mutation for UpdateColumn {
    fn target(&self) -> MutationTarget {
        MutationTarget::Column(self.column_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateColumn {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let column = ctx.write(|conn| {
                let mut column = require_column(conn, &self.column_id, user)?;
                if let Some(title) = &self.title {
                    column.title = validate::title("title", title, ctx.limits().max_title_length)?;
                }
                if let Some(hide) = self.hide_completed {
                    column.hide_completed = hide;
                }
                if let Some(color) = &self.color {
                    column.color = validate::optional_text(Some(color.as_str()));
                }
                columns::update(conn, &column)?;
                workspaces::touch(conn, &column.workspace_id, now)?;
                Ok(column)
            })?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
