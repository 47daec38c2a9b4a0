//! CreateWorkspace command

use super::snapshot;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{columns, workspaces};
use crate::types::{Column, ColumnId, Workspace, WorkspaceId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Title of the column every new workspace starts with
pub const DEFAULT_COLUMN_TITLE: &str = "To Do";

/// Create a workspace owned by the caller, seeded with one column
#[operation(
    verb = "create",
    noun = "workspace",
    description = "Create a workspace owned by the caller"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateWorkspace {
    /// Workspace title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Icon name or emoji
    #[serde(default)]
    pub icon: Option<String>,
}

impl CreateWorkspace {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            icon: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

impl Mutation for CreateWorkspace {
    fn target(&self) -> MutationTarget {
        MutationTarget::Global
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for CreateWorkspace {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let workspace = Workspace {
                id: WorkspaceId::new(),
                owner_id: user.clone(),
                title: validate::title("title", &self.title, ctx.limits().max_title_length)?,
                description: validate::optional_text(self.description.as_deref()),
                icon: validate::optional_text(self.icon.as_deref()),
                editing_by: None,
                editing_at: None,
                invite_token: None,
                created_at: now,
                updated_at: now,
            };
            let column = Column {
                id: ColumnId::new(),
                workspace_id: workspace.id.clone(),
                title: DEFAULT_COLUMN_TITLE.to_string(),
                order: 0,
                hide_completed: false,
                color: None,
                created_at: now,
            };

            let board = ctx.write(|conn| {
                workspaces::insert(conn, &workspace)?;
                columns::insert(conn, &column)?;
                snapshot(conn, &ctx.locks(conn), &workspace, user)
            })?;
            info!(workspace_id = %workspace.id, owner = %user, "created workspace");
            Ok(serde_json::to_value(board)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
