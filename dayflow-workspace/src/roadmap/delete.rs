//! DeleteRoadmap command

use super::require_roadmap;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{roadmaps, workspaces};
use crate::types::RoadmapId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Delete a roadmap with all of its nodes
#[operation(verb = "delete", noun = "roadmap", description = "Delete a roadmap and its nodes")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteRoadmap {
    /// Roadmap to delete
    pub roadmap_id: RoadmapId,
}

impl DeleteRoadmap {
    pub fn new(roadmap_id: impl Into<RoadmapId>) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
        }
    }
}

impl Mutation for DeleteRoadmap {
    fn target(&self) -> MutationTarget {
        MutationTarget::Roadmap(self.roadmap_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteRoadmap {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            ctx.write(|conn| {
                let roadmap = require_roadmap(conn, &self.roadmap_id, user)?;
                roadmaps::delete(conn, &roadmap.id)?;
                workspaces::touch(conn, &roadmap.workspace_id, now)
            })?;
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.roadmap_id,
            }))
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

    #[tokio::test]
    async fn test_delete_removes_nodes() {
        let bed = setup().await;
        let roadmap = CreateRoadmap::new(bed.workspace.clone(), "Plan")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let id = RoadmapId::from(roadmap["id"].as_str().unwrap());
        AddRoadmapNode::new(id.clone(), "Phase 1")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();

        DeleteRoadmap::new(id.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let nodes = bed
            .ctx
            .db()
            .read(|conn| roadmaps::count_nodes(conn, &id))
            .unwrap();
        assert_eq!(nodes, 0);
    }
}
