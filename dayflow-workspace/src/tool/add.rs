//! AddTool command

use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{tools, workspaces};
use crate::types::{Tool, ToolId, WorkspaceId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Add a tool to a workspace, or to the caller's hub when no workspace is given
#[operation(
    verb = "add",
    noun = "tool",
    description = "Add a tool link to a workspace or the personal hub"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTool {
    /// Tool name
    pub title: String,
    /// Workspace to add it to; `None` keeps it in the hub
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
    /// URL the tool opens
    #[serde(default)]
    pub link: Option<String>,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Icon name or emoji
    #[serde(default)]
    pub icon: Option<String>,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AddTool {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            workspace_id: None,
            link: None,
            description: None,
            icon: None,
            tags: Vec::new(),
        }
    }

    pub fn in_workspace(mut self, workspace_id: impl Into<WorkspaceId>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Mutation for AddTool {
    fn target(&self) -> MutationTarget {
        match &self.workspace_id {
            Some(workspace) => MutationTarget::Workspace(workspace.clone()),
            None => MutationTarget::Global,
        }
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AddTool {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let limits = ctx.limits();
            let link = match validate::optional_text(self.link.as_deref()) {
                Some(link) => Some(validate::link("link", &link)?),
                None => None,
            };
            let tool = Tool {
                id: ToolId::new(),
                owner_id: user.clone(),
                workspace_id: self.workspace_id.clone(),
                title: validate::title("title", &self.title, limits.max_title_length)?,
                link,
                description: validate::optional_text(self.description.as_deref()),
                icon: validate::optional_text(self.icon.as_deref()),
                tags: validate::tags(&self.tags),
                created_at: ctx.now(),
            };

            ctx.write(|conn| {
                let existing = match &tool.workspace_id {
                    Some(workspace_id) => {
                        access::require_access(conn, workspace_id, user)?;
                        tools::count_in_workspace(conn, workspace_id)?
                    }
                    None => u32::try_from(tools::list_hub(conn, user)?.len()).unwrap_or(u32::MAX),
                };
                validate::within_limit("tools", existing, limits.max_tools_per_workspace)?;
                tools::insert(conn, &tool)?;
                if let Some(workspace_id) = &tool.workspace_id {
                    workspaces::touch(conn, workspace_id, tool.created_at)?;
                }
                Ok(())
            })?;
            Ok(serde_json::to_value(&tool)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
