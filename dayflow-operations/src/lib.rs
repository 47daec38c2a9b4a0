//! Command plumbing shared by the dayflow crates.
//!
//! Every client request is a plain struct whose fields are its parameters.
//! `#[operation]` gives it a stable `"{verb} {noun}"` name, [`Execute`] runs
//! it against a context, and the [`ExecutionResult`] it returns says whether
//! the call belongs in the activity log.
//!
//! ## Example
//!
//! ```ignore
//! use dayflow_operations::*;
//!
//! #[operation(verb = "add", noun = "column", description = "Add a column to a workspace")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddColumn {
//!     /// Owning workspace
//!     pub workspace_id: WorkspaceId,
//!     /// Column title
//!     pub title: String,
//! }
//!
//! #[async_trait]
//! impl Execute<RequestContext, WorkspaceError> for AddColumn {
//!     async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
//!         // mutations return ExecutionResult::logged, queries unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use dayflow_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
