//! Client-side state for Dayflow workspaces
//!
//! A client keeps its own copy of the workspace it shows and edits it
//! optimistically:
//!
//! - [`ClientStore`] applies a mutation locally with the server's ordering
//!   rules, sends it through a [`WorkspaceApi`], and rolls back if the server
//!   refuses
//! - [`patch_workspace`] merges a fresh server snapshot into the local copy,
//!   touching only what changed
//! - [`UndoBuffer`] remembers the last destructive action for a one-shot undo

mod api;
mod error;
mod reconcile;
mod store;
mod undo;

pub use api::{ColumnFields, InProcessApi, NewCard, WorkspaceApi};
pub use error::{ApiError, Result};
pub use reconcile::{patch_workspace, reconcile_list, Keyed, Patch, PatchReport};
pub use store::ClientStore;
pub use undo::{Restored, UndoAction, UndoBuffer};
