//! Roadmap commands
//!
//! A workspace has at most one roadmap. Nodes form a tree stored flat by
//! parent id; siblings keep dense orders like any other container.

mod add_node;
mod create;
mod delete;
mod delete_node;
mod get;
mod reorder_nodes;
mod update_node;

pub use add_node::AddRoadmapNode;
pub use create::CreateRoadmap;
pub use delete::DeleteRoadmap;
pub use delete_node::DeleteRoadmapNode;
pub use get::GetRoadmap;
pub use reorder_nodes::ReorderRoadmapNodes;
pub use update_node::UpdateRoadmapNode;

use crate::access;
use crate::error::{Result, WorkspaceError};
use crate::order::Container;
use crate::store::roadmaps;
use crate::types::{Roadmap, RoadmapId, RoadmapNode, RoadmapNodeId, RoadmapTree, UserId};
use rusqlite::Connection;

pub(crate) fn require_roadmap(conn: &Connection, id: &RoadmapId, user: &UserId) -> Result<Roadmap> {
    let roadmap =
        roadmaps::get(conn, id)?.ok_or_else(|| WorkspaceError::not_found("roadmap", id))?;
    access::require_access(conn, &roadmap.workspace_id, user)
        .map_err(|_| WorkspaceError::not_found("roadmap", id))?;
    Ok(roadmap)
}

pub(crate) fn require_node(
    conn: &Connection,
    id: &RoadmapNodeId,
    user: &UserId,
) -> Result<(RoadmapNode, Roadmap)> {
    let node =
        roadmaps::get_node(conn, id)?.ok_or_else(|| WorkspaceError::not_found("roadmap node", id))?;
    let roadmap = require_roadmap(conn, &node.roadmap_id, user)
        .map_err(|_| WorkspaceError::not_found("roadmap node", id))?;
    Ok((node, roadmap))
}

/// Fail unless `parent` is a node of `roadmap`
pub(crate) fn check_parent(
    conn: &Connection,
    roadmap: &RoadmapId,
    parent: Option<&RoadmapNodeId>,
) -> Result<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    match roadmaps::get_node(conn, parent)? {
        Some(node) if node.roadmap_id == *roadmap => Ok(()),
        _ => Err(WorkspaceError::invalid_target(format!("{parent} is not a node of this roadmap"))),
    }
}

/// Siblings of a node
pub(crate) fn level_of(node: &RoadmapNode) -> Container {
    Container::RoadmapLevel {
        roadmap: node.roadmap_id.clone(),
        parent: node.parent_id.clone(),
    }
}

pub(crate) fn load_tree(conn: &Connection, roadmap: Roadmap) -> Result<RoadmapTree> {
    let nodes = roadmaps::list_nodes(conn, &roadmap.id)?;
    Ok(RoadmapTree::build(roadmap, nodes))
}
