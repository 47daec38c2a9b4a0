//! UpdateWorkspace command

use super::summarize;
use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::workspaces;
use crate::types::WorkspaceId;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Change a workspace's title, description or icon. Omitted fields are kept;
/// blank description or icon clears it.
#[operation(
    verb = "update",
    noun = "workspace",
    description = "Change a workspace's title, description or icon"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateWorkspace {
    /// Workspace to edit
    pub workspace_id: WorkspaceId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New icon
    #[serde(default)]
    pub icon: Option<String>,
}

impl UpdateWorkspace {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            title: None,
            description: None,
            icon: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
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

impl Mutation for UpdateWorkspace {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateWorkspace {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let summary = ctx.write(|conn| {
                let mut workspace = access::require_access(conn, &self.workspace_id, user)?;
                if let Some(title) = &self.title {
                    workspace.title =
                        validate::title("title", title, ctx.limits().max_title_length)?;
                }
                if let Some(description) = &self.description {
                    workspace.description = validate::optional_text(Some(description.as_str()));
                }
                if let Some(icon) = &self.icon {
                    workspace.icon = validate::optional_text(Some(icon.as_str()));
                }
                workspace.updated_at = now;
                workspaces::update_details(
                    conn,
                    &workspace.id,
                    &workspace.title,
                    workspace.description.as_deref(),
                    workspace.icon.as_deref(),
                    now,
                )?;
                summarize(conn, &ctx.locks(conn), &workspace, user)
            })?;
            Ok(serde_json::to_value(summary)?)
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
    async fn test_update_title_keeps_other_fields() {
        let bed = setup().await;
        UpdateWorkspace::new(bed.workspace.clone())
            .with_description("Q3 plans")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        let result = UpdateWorkspace::new(bed.workspace.clone())
            .with_title("Roadmap")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "Roadmap");
        assert_eq!(result["description"], "Q3 plans");
    }

    #[tokio::test]
    async fn test_blank_description_clears() {
        let bed = setup().await;
        let result = UpdateWorkspace::new(bed.workspace.clone())
            .with_description(" ")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert!(result["description"].is_null());
    }

    #[tokio::test]
    async fn test_outsider_cannot_update() {
        let bed = setup().await;
        let result = UpdateWorkspace::new(bed.workspace.clone())
            .with_title("Mine")
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
