//! Read models returned by queries and mutations

use super::entities::{Card, Column, Roadmap, RoadmapNode, Tool, User};
use super::ids::{UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public part of a user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Lease as seen by a particular viewer
///
/// Every field is `None` once the lease expired, whatever the stored columns say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeaseView {
    pub editing_by: Option<UserId>,
    pub editing_user: Option<UserSummary>,
    pub editing_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_editing_by_me: bool,
}

/// Result of the lock commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    pub workspace_id: WorkspaceId,
    #[serde(flatten)]
    pub lease: LeaseView,
}

/// A workspace in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub id: WorkspaceId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub is_owner: bool,
    pub pinned: bool,
    #[serde(flatten)]
    pub lease: LeaseView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column together with its cards in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWithCards {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

/// Everything a board screen needs about one workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(flatten)]
    pub summary: WorkspaceSummary,
    pub owner: UserSummary,
    pub members: Vec<UserSummary>,
    pub columns: Vec<ColumnWithCards>,
    pub backlog: Vec<Card>,
    pub tools: Vec<Tool>,
    /// Only present for the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
}

/// A roadmap node with its children, recursively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapNodeTree {
    #[serde(flatten)]
    pub node: RoadmapNode,
    pub children: Vec<RoadmapNodeTree>,
}

/// A roadmap with its node tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapTree {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    pub nodes: Vec<RoadmapNodeTree>,
}

impl RoadmapTree {
    /// Build the tree from a flat node list, ordering every level by `order`
    pub fn build(roadmap: Roadmap, nodes: Vec<RoadmapNode>) -> Self {
        fn level(parent: Option<&RoadmapNode>, all: &[RoadmapNode]) -> Vec<RoadmapNodeTree> {
            let parent_id = parent.map(|p| &p.id);
            let mut children: Vec<&RoadmapNode> = all
                .iter()
                .filter(|n| n.parent_id.as_ref() == parent_id)
                .collect();
            children.sort_by_key(|n| n.order);
            children
                .into_iter()
                .map(|n| RoadmapNodeTree {
                    node: n.clone(),
                    children: level(Some(n), all),
                })
                .collect()
        }

        let nodes = level(None, &nodes);
        Self { roadmap, nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RoadmapId, RoadmapNodeId};

    fn node(id: &str, parent: Option<&str>, order: usize) -> RoadmapNode {
        RoadmapNode {
            id: RoadmapNodeId::from(id),
            roadmap_id: RoadmapId::from("r"),
            parent_id: parent.map(RoadmapNodeId::from),
            title: id.to_string(),
            done: false,
            order,
        }
    }

    #[test]
    fn test_tree_orders_each_level() {
        let roadmap = Roadmap {
            id: RoadmapId::from("r"),
            workspace_id: WorkspaceId::from("w"),
            owner_id: UserId::from("u"),
            title: "Plan".into(),
            source_text: None,
            created_at: Utc::now(),
        };
        let tree = RoadmapTree::build(
            roadmap,
            vec![
                node("b", None, 1),
                node("a", None, 0),
                node("a2", Some("a"), 1),
                node("a1", Some("a"), 0),
            ],
        );

        let top: Vec<_> = tree.nodes.iter().map(|n| n.node.id.as_str()).collect();
        assert_eq!(top, vec!["a", "b"]);
        let kids: Vec<_> = tree.nodes[0]
            .children
            .iter()
            .map(|n| n.node.id.as_str())
            .collect();
        assert_eq!(kids, vec!["a1", "a2"]);
        assert!(tree.nodes[1].children.is_empty());
    }
}
