//! Collaborative workspace engine backed by SQLite
//!
//! Users own workspaces that hold ordered columns of cards, a backlog, tools
//! and a roadmap, and invite collaborators to edit them. Concurrent editing is
//! coordinated by a time-bounded editing lease per workspace.
//!
//! ## Overview
//!
//! - **Access guard** - owner or member may act; everyone else gets `NotFound`
//! - **Editing lease** - one live holder per workspace, expiry computed on read
//! - **Dense ordering** - every container keeps member orders at exactly `0..n`
//! - **Guarded mutations** - the processor runs every mutation behind
//!   [`LockMiddleware`], which requires the lease unless the operation is exempt
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use dayflow_workspace::{
//!     card::AddCard, lock::AcquireLock, workspace::CreateWorkspace, RequestContext, UserId,
//!     WorkspaceContext, WorkspaceOperationProcessor,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Arc::new(WorkspaceContext::from_default_config()?);
//! let alice = RequestContext::authenticated(ctx.clone(), UserId::from("alice"));
//! let processor = WorkspaceOperationProcessor::new();
//!
//! let board = processor.mutate(&CreateWorkspace::new("Launch"), &alice).await?;
//! let workspace_id = board["id"].as_str().unwrap_or_default();
//! let column_id = board["columns"][0]["id"].as_str().unwrap_or_default();
//!
//! processor.mutate(&AcquireLock::new(workspace_id), &alice).await?;
//! processor.mutate(&AddCard::new("Write the announcement").in_column(column_id), &alice).await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
mod context;
pub mod db;
pub mod dispatch;
mod error;
pub mod lock;
pub mod order;
mod processor;
pub mod store;
pub mod types;
pub mod validate;

// Command modules
pub mod activity;
pub mod card;
pub mod column;
pub mod hub;
pub mod roadmap;
pub mod tool;
pub mod user;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use dayflow_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use context::{RequestContext, WorkspaceContext};
pub use db::Database;
pub use dispatch::{
    is_lock_exempt, Admission, ExemptionPredicate, Guarded, LockMiddleware, Mutation,
    MutationTarget, LOCK_EXEMPT_OPERATIONS,
};
pub use error::{
    ClientError, ErrorCode, LeaseDenial, Result, WorkspaceError, INTERNAL_ERROR_MESSAGE,
    LOCK_CONFLICT_MESSAGE,
};
pub use lock::{LeaseState, LockManager};
pub use processor::WorkspaceOperationProcessor;

pub use types::{
    Card, CardId, CardKind, Column, ColumnId, ColumnWithCards, LeaseView, LockStatus, Roadmap,
    RoadmapId, RoadmapNode, RoadmapNodeId, RoadmapTree, Tool, ToolId, User, UserId, UserSummary,
    Workspace, WorkspaceId, WorkspaceSnapshot, WorkspaceSummary,
};
