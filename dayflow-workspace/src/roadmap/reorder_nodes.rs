//! ReorderRoadmapNodes command

use super::{check_parent, load_tree, require_roadmap};
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::Container;
use crate::store::workspaces;
use crate::types::{RoadmapId, RoadmapNodeId};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Set the order of the nodes sharing `parent_id` (top level when omitted)
///
/// Siblings not listed keep their relative order after the listed ones.
#[operation(
    verb = "reorder",
    noun = "roadmap nodes",
    description = "Set the order of sibling roadmap nodes"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderRoadmapNodes {
    /// Roadmap the siblings belong to
    pub roadmap_id: RoadmapId,
    /// Common parent; `None` for root nodes
    #[serde(default)]
    pub parent_id: Option<RoadmapNodeId>,
    /// Siblings in their new order; unlisted siblings follow
    pub node_ids: Vec<RoadmapNodeId>,
}

impl ReorderRoadmapNodes {
    pub fn new(roadmap_id: impl Into<RoadmapId>, node_ids: Vec<RoadmapNodeId>) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
            parent_id: None,
            node_ids,
        }
    }

    pub fn under(mut self, parent_id: impl Into<RoadmapNodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

impl Mutation for ReorderRoadmapNodes {
    fn target(&self) -> MutationTarget {
        MutationTarget::Roadmap(self.roadmap_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ReorderRoadmapNodes {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let listed: Vec<String> = self.node_ids.iter().map(|id| id.to_string()).collect();
            let tree = ctx.write(|conn| {
                let roadmap = require_roadmap(conn, &self.roadmap_id, user)?;
                check_parent(conn, &roadmap.id, self.parent_id.as_ref())?;
                let level = Container::RoadmapLevel {
                    roadmap: roadmap.id.clone(),
                    parent: self.parent_id.clone(),
                };
                if level.reorder_explicit(conn, &listed)? > 0 {
                    workspaces::touch(conn, &roadmap.workspace_id, now)?;
                }
                load_tree(conn, roadmap)
            })?;
            Ok(serde_json::to_value(tree)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
