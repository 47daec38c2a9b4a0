//! DeleteRoadmapNode command

use super::{level_of, require_node};
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{roadmaps, workspaces};
use crate::types::RoadmapNodeId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Delete a node and its subtree; its siblings close up
#[operation(
    verb = "delete",
    noun = "roadmap node",
    description = "Delete a roadmap node and everything under it"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteRoadmapNode {
    /// Node to delete along with its subtree
    pub node_id: RoadmapNodeId,
}

impl DeleteRoadmapNode {
    pub fn new(node_id: impl Into<RoadmapNodeId>) -> Self {
        Self {
            node_id: node_id.into(),
        }
    }
}

impl Mutation for DeleteRoadmapNode {
    fn target(&self) -> MutationTarget {
        MutationTarget::RoadmapNode(self.node_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteRoadmapNode {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            ctx.write(|conn| {
                let (node, roadmap) = require_node(conn, &self.node_id, user)?;
                roadmaps::delete_node(conn, &node.id)?;
                level_of(&node).compact(conn)?;
                workspaces::touch(conn, &roadmap.workspace_id, now)
            })?;
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.node_id,
            }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{orders, Container};
    use crate::roadmap::{AddRoadmapNode, CreateRoadmap};
    use crate::test_support::setup;
    use crate::types::RoadmapId;

    #[tokio::test]
    async fn test_delete_subtree_and_renumber() {
        let bed = setup().await;
        let roadmap = CreateRoadmap::new(bed.workspace.clone(), "Plan")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let roadmap_id = RoadmapId::from(roadmap["id"].as_str().unwrap());

        let mut top = Vec::new();
        for title in ["a", "b", "c"] {
            let node = AddRoadmapNode::new(roadmap_id.clone(), title)
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
            top.push(RoadmapNodeId::from(node["id"].as_str().unwrap()));
        }
        AddRoadmapNode::new(roadmap_id.clone(), "a.1")
            .under(top[0].clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        DeleteRoadmapNode::new(top[0].clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        let level = Container::RoadmapLevel {
            roadmap: roadmap_id.clone(),
            parent: None,
        };
        let (remaining, total) = bed
            .ctx
            .db()
            .read(|conn| {
                let remaining = orders(conn, &level)?;
                Ok((remaining, roadmaps::count_nodes(conn, &roadmap_id)?))
            })
            .unwrap();
        assert_eq!(remaining, vec![0, 1]);
        assert_eq!(total, 2);
    }
}
