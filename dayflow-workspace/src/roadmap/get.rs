//! GetRoadmap command

use super::load_tree;
use crate::access;
use crate::context::RequestContext;
use crate::error::WorkspaceError;
use crate::store::roadmaps;
use crate::types::WorkspaceId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};

/// The roadmap of a workspace as a tree
#[operation(verb = "get", noun = "roadmap", description = "Get a workspace's roadmap tree")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetRoadmap {
    /// Workspace whose roadmap to fetch
    pub workspace_id: WorkspaceId,
}

impl GetRoadmap {
    pub fn new(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for GetRoadmap {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let result = async {
            let user = ctx.require_user()?;
            let tree = ctx.db().read(|conn| {
                access::require_access(conn, &self.workspace_id, user)?;
                let roadmap = roadmaps::get_for_workspace(conn, &self.workspace_id)?
                    .ok_or_else(|| WorkspaceError::not_found("roadmap", &self.workspace_id))?;
                load_tree(conn, roadmap)
            })?;
            Ok(serde_json::to_value(tree)?)
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::{AddRoadmapNode, CreateRoadmap};
    use crate::test_support::setup;
    use crate::types::{RoadmapId, RoadmapNodeId};

    #[tokio::test]
    async fn test_tree_nests_children_in_order() {
        let bed = setup().await;
        let roadmap = CreateRoadmap::new(bed.workspace.clone(), "Plan")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let roadmap_id = RoadmapId::from(roadmap["id"].as_str().unwrap());

        let phase = AddRoadmapNode::new(roadmap_id.clone(), "Phase 1")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let phase_id = RoadmapNodeId::from(phase["id"].as_str().unwrap());
        for title in ["Design", "Build"] {
            AddRoadmapNode::new(roadmap_id.clone(), title)
                .under(phase_id.clone())
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
        }

        let tree = GetRoadmap::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(tree["nodes"].as_array().unwrap().len(), 1);
        let children = &tree["nodes"][0]["children"];
        assert_eq!(children[0]["title"], "Design");
        assert_eq!(children[1]["title"], "Build");
        assert_eq!(children[1]["order"], 1);
    }

    #[tokio::test]
    async fn test_missing_roadmap() {
        let bed = setup().await;
        let result = GetRoadmap::new(bed.workspace.clone())
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
