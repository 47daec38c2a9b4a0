//! UpdateTool command

use super::require_tool;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::tools;
use crate::types::ToolId;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Edit a tool. Omitted fields are kept; blank optional text clears it.
#[operation(verb = "update", noun = "tool", description = "Edit a tool")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTool {
    /// Tool to edit
    pub tool_id: ToolId,
    /// New name
    #[serde(default)]
    pub title: Option<String>,
    /// New URL
    #[serde(default)]
    pub link: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New icon
    #[serde(default)]
    pub icon: Option<String>,
    /// Replacement tag list
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl UpdateTool {
    pub fn new(tool_id: impl Into<ToolId>) -> Self {
        Self {
            tool_id: tool_id.into(),
            title: None,
            link: None,
            description: None,
            icon: None,
            tags: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl Mutation for UpdateTool {
    fn target(&self) -> MutationTarget {
        MutationTarget::Tool(self.tool_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateTool {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let tool = ctx.write(|conn| {
                let mut tool = require_tool(conn, &self.tool_id, user)?;
                if let Some(title) = &self.title {
                    tool.title = validate::title("title", title, ctx.limits().max_title_length)?;
                }
                if let Some(link) = &self.link {
                    tool.link = match validate::optional_text(Some(link.as_str())) {
                        Some(link) => Some(validate::link("link", &link)?),
                        None => None,
                    };
                }
                if let Some(description) = &self.description {
                    tool.description = validate::optional_text(Some(description.as_str()));
                }
                if let Some(icon) = &self.icon {
                    tool.icon = validate::optional_text(Some(icon.as_str()));
                }
                if let Some(tags) = &self.tags {
                    tool.tags = validate::tags(tags);
                }
                tools::update(conn, &tool)?;
                Ok(tool)
            })?;
            Ok(serde_json::to_value(&tool)?)
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
    async fn test_update_and_clear_link() {
        let bed = setup().await;
        let tool = AddTool::new("Docs")
            .with_link("https://docs.rs")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let id = tool["id"].as_str().unwrap();

        let result = UpdateTool::new(id)
            .with_title("Rust docs")
            .with_link("")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "Rust docs");
        assert!(result["link"].is_null());
    }

    #[tokio::test]
    async fn test_hub_tool_hidden_from_others() {
        let bed = setup().await;
        let tool = AddTool::new("Mine").execute(&bed.alice).await.into_result().unwrap();
        let result = UpdateTool::new(tool["id"].as_str().unwrap())
            .with_title("Stolen")
            .execute(&bed.bob)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
