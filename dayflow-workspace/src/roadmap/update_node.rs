//! UpdateRoadmapNode command

use super::require_node;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{roadmaps, workspaces};
use crate::types::RoadmapNodeId;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[operation(
    verb = "update",
    noun = "roadmap node",
    description = "Rename a roadmap node or mark it done"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateRoadmapNode {
    /// Node to edit
    pub node_id: RoadmapNodeId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New done flag
    #[serde(default)]
    pub done: Option<bool>,
}

impl UpdateRoadmapNode {
    pub fn new(node_id: impl Into<RoadmapNodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            title: None,
            done: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}

impl Mutation for UpdateRoadmapNode {
    fn target(&self) -> MutationTarget {
        MutationTarget::RoadmapNode(self.node_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateRoadmapNode {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let node = ctx.write(|conn| {
                let (mut node, roadmap) = require_node(conn, &self.node_id, user)?;
                if let Some(title) = &self.title {
                    node.title = validate::title("title", title, ctx.limits().max_title_length)?;
                }
                if let Some(done) = self.done {
                    node.done = done;
                }
                roadmaps::update_node(conn, &node)?;
                workspaces::touch(conn, &roadmap.workspace_id, now)?;
                Ok(node)
            })?;
            Ok(serde_json::to_value(&node)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::{AddRoadmapNode, CreateRoadmap};
    use crate::test_support::setup;
    use crate::types::RoadmapId;

    #[tokio::test]
    async fn test_mark_done() {
        let bed = setup().await;
        let roadmap = CreateRoadmap::new(bed.workspace.clone(), "Plan")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let node = AddRoadmapNode::new(RoadmapId::from(roadmap["id"].as_str().unwrap()), "a")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        let result = UpdateRoadmapNode::new(node["id"].as_str().unwrap())
            .with_done(true)
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["done"], true);
        assert_eq!(result["title"], "a");
    }
}
