//! AddRoadmapNode command

use super::{check_parent, level_of, require_roadmap};
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::append_position;
use crate::store::{roadmaps, workspaces};
use crate::types::{RoadmapId, RoadmapNode, RoadmapNodeId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Append a node at the top level of a roadmap or under `parent_id`
#[operation(
    verb = "add",
    noun = "roadmap node",
    description = "Add a node to a roadmap"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddRoadmapNode {
    /// Roadmap to add to
    pub roadmap_id: RoadmapId,
    /// Parent node; `None` adds a root node
    #[serde(default)]
    pub parent_id: Option<RoadmapNodeId>,
    /// Node title
    pub title: String,
}

impl AddRoadmapNode {
    pub fn new(roadmap_id: impl Into<RoadmapId>, title: impl Into<String>) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
            parent_id: None,
            title: title.into(),
        }
    }

    pub fn under(mut self, parent_id: impl Into<RoadmapNodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

impl Mutation for AddRoadmapNode {
    fn target(&self) -> MutationTarget {
        MutationTarget::Roadmap(self.roadmap_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AddRoadmapNode {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let limits = ctx.limits();
            let title = validate::title("title", &self.title, limits.max_title_length)?;
            let now = ctx.now();

            let node = ctx.write(|conn| {
                let roadmap = require_roadmap(conn, &self.roadmap_id, user)?;
                check_parent(conn, &roadmap.id, self.parent_id.as_ref())?;
                validate::within_limit(
                    "roadmap nodes",
                    roadmaps::count_nodes(conn, &roadmap.id)?,
                    limits.max_roadmap_nodes,
                )?;

                let mut node = RoadmapNode {
                    id: RoadmapNodeId::new(),
                    roadmap_id: roadmap.id.clone(),
                    parent_id: self.parent_id.clone(),
                    title,
                    done: false,
                    order: 0,
                };
                node.order = append_position(level_of(&node).len(conn)?);
                roadmaps::insert_node(conn, &node, now)?;
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
    use crate::roadmap::CreateRoadmap;
    use crate::test_support::{setup, setup_with_config, TestBed};
    use dayflow_config::DayflowConfig;

    async fn roadmap(bed: &TestBed) -> RoadmapId {
        let created = CreateRoadmap::new(bed.workspace.clone(), "Plan")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        RoadmapId::from(created["id"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_siblings_append() {
        let bed = setup().await;
        let id = roadmap(&bed).await;
        for (i, title) in ["a", "b", "c"].iter().enumerate() {
            let node = AddRoadmapNode::new(id.clone(), *title)
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
            assert_eq!(node["order"], i);
        }
    }

    #[tokio::test]
    async fn test_parent_from_other_roadmap_rejected() {
        let bed = setup().await;
        let id = roadmap(&bed).await;
        let result = AddRoadmapNode::new(id, "child")
            .under("stranger")
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::InvalidTarget { .. })));
    }

    #[tokio::test]
    async fn test_node_limit() {
        let mut config = DayflowConfig::default();
        config.limits.max_roadmap_nodes = 1;
        let bed = setup_with_config(config).await;
        let id = roadmap(&bed).await;

        AddRoadmapNode::new(id.clone(), "one")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let result = AddRoadmapNode::new(id, "two")
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::LimitReached { .. })));
    }
}
