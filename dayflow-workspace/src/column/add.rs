//! AddColumn command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::{append_position, Container};
use crate::store::{columns, workspaces};
use crate::types::{Column, ColumnId, WorkspaceId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Append a column to a workspace
#[operation(
    verb = "add",
    noun = "column",
    description = "Add a column at the end of a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddColumn {
    /// Owning workspace
    pub workspace_id: WorkspaceId,
    /// Column title
    pub title: String,
    /// Hide done cards in this column
    #[serde(default)]
    pub hide_completed: bool,
    /// Display color
    #[serde(default)]
    pub color: Option<String>,
}

impl AddColumn {
    pub fn new(workspace_id: impl Into<WorkspaceId>, title: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            title: title.into(),
            hide_completed: false,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = hide;
        self
    }
}

impl Mutation for AddColumn {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AddColumn {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let limits = ctx.limits();
            let title = validate::title("title", &self.title, limits.max_title_length)?;
            let now = ctx.now();

            let column = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let existing = Container::Columns(self.workspace_id.clone()).len(conn)?;
                validate::within_limit(
                    "columns",
                    u32::try_from(existing).unwrap_or(u32::MAX),
                    limits.max_columns_per_workspace,
                )?;

                let column = Column {
                    id: ColumnId::new(),
                    workspace_id: self.workspace_id.clone(),
                    title,
                    order: append_position(existing),
                    hide_completed: self.hide_completed,
                    color: validate::optional_text(self.color.as_deref()),
                    created_at: now,
                };
                columns::insert(conn, &column)?;
                workspaces::touch(conn, &self.workspace_id, now)?;
                Ok(column)
            })?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup, setup_with_config};
    use dayflow_config::DayflowConfig;

    #[tokio::test]
    async fn test_add_column_appends() {
        let bed = setup().await;
        let result = AddColumn::new(bed.workspace.clone(), "Doing")
            .with_color("#ff8800")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["title"], "Doing");
        assert_eq!(result["order"], 1);
        assert_eq!(result["color"], "#ff8800");
    }

    #[tokio::test]
    async fn test_column_limit() {
        let mut config = DayflowConfig::default();
        config.limits.max_columns_per_workspace = 2;
        let bed = setup_with_config(config).await;

        AddColumn::new(bed.workspace.clone(), "Two")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let result = AddColumn::new(bed.workspace.clone(), "Three")
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(
            result,
            Err(WorkspaceError::LimitReached { limit: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_outsider_cannot_add() {
        let bed = setup().await;
        let result = AddColumn::new(bed.workspace.clone(), "Mine")
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
