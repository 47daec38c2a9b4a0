//! Stored entities

use super::card::CardKind;
use super::ids::{CardId, ColumnId, RoadmapId, RoadmapNodeId, ToolId, UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A workspace row, including the raw lease columns
///
/// `editing_by` may still be populated after the lease expired; use
/// [`crate::lock::LeaseState`] to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub editing_by: Option<UserId>,
    #[serde(default)]
    pub editing_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub invite_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column in a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub order: usize,
    #[serde(default)]
    pub hide_completed: bool,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A card
///
/// Which container it lives in follows from `workspace_id`/`column_id`:
/// both set is a column, only the workspace is its backlog, neither is the
/// owner's hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner_id: UserId,
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub kind: CardKind,
    pub payload: Value,
    pub order: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookmarked tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub owner_id: UserId,
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The roadmap of a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: RoadmapId,
    pub workspace_id: WorkspaceId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub source_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One node of a roadmap; `parent_id` is `None` for top-level nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub id: RoadmapNodeId,
    pub roadmap_id: RoadmapId,
    #[serde(default)]
    pub parent_id: Option<RoadmapNodeId>,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub order: usize,
}
