//! Core types for the workspace engine

mod card;
mod entities;
mod ids;
mod views;

pub use card::{CardKind, ChecklistItem, ChecklistPayload, LinkPayload, NotePayload};
pub use entities::{Card, Column, Roadmap, RoadmapNode, Tool, User, Workspace};
pub use ids::{CardId, ColumnId, RoadmapId, RoadmapNodeId, ToolId, UserId, WorkspaceId};
pub use views::{
    ColumnWithCards, LeaseView, LockStatus, RoadmapNodeTree, RoadmapTree, UserSummary,
    WorkspaceSnapshot, WorkspaceSummary,
};
