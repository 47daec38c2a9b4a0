//! CreateRoadmap command

use super::load_tree;
use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{roadmaps, workspaces};
use crate::types::{Roadmap, RoadmapId, WorkspaceId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Start the roadmap of a workspace
#[operation(
    verb = "create",
    noun = "roadmap",
    description = "Create the roadmap of a workspace"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateRoadmap {
    /// Workspace the roadmap belongs to
    pub workspace_id: WorkspaceId,
    /// Roadmap title
    pub title: String,
    /// Free text the roadmap was drafted from
    #[serde(default)]
    pub source_text: Option<String>,
}

impl CreateRoadmap {
    pub fn new(workspace_id: impl Into<WorkspaceId>, title: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            title: title.into(),
            source_text: None,
        }
    }

    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }
}

impl Mutation for CreateRoadmap {
    fn target(&self) -> MutationTarget {
        MutationTarget::Workspace(self.workspace_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for CreateRoadmap {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let roadmap = Roadmap {
                id: RoadmapId::new(),
                workspace_id: self.workspace_id.clone(),
                owner_id: user.clone(),
                title: validate::title("title", &self.title, ctx.limits().max_title_length)?,
                source_text: validate::optional_text(self.source_text.as_deref()),
                created_at: ctx.now(),
            };
            let tree = ctx.write(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                if roadmaps::get_for_workspace(conn, &self.workspace_id)?.is_some() {
                    return Err(WorkspaceError::AlreadyExists {
                        resource: "roadmap",
                        value: self.workspace_id.to_string(),
                    });
                }
                roadmaps::insert(conn, &roadmap)?;
                workspaces::touch(conn, &self.workspace_id, roadmap.created_at)?;
                load_tree(conn, roadmap)
            })?;
            Ok(serde_json::to_value(tree)?)
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
    async fn test_one_roadmap_per_workspace() {
        let bed = setup().await;
        let created = CreateRoadmap::new(bed.workspace.clone(), "Launch plan")
            .with_source_text("ship it")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(created["title"], "Launch plan");
        assert_eq!(created["nodes"], serde_json::json!([]));

        let again = CreateRoadmap::new(bed.workspace.clone(), "Second")
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(again, Err(WorkspaceError::AlreadyExists { .. })));
    }
}
