//! Tool commands: bookmarked links kept next to a board or in the hub

mod add;
mod delete;
mod list;
mod update;

pub use add::AddTool;
pub use delete::DeleteTool;
pub use list::ListTools;
pub use update::UpdateTool;

use crate::access;
use crate::error::{Result, WorkspaceError};
use crate::store::tools;
use crate::types::{Tool, ToolId, UserId};
use rusqlite::Connection;

pub(crate) fn require_tool(conn: &Connection, id: &ToolId, user: &UserId) -> Result<Tool> {
    let tool = tools::get(conn, id)?.ok_or_else(|| WorkspaceError::not_found("tool", id))?;
    let visible = match &tool.workspace_id {
        Some(workspace) => access::has_access(conn, workspace, user)?,
        None => tool.owner_id == *user,
    };
    if visible {
        Ok(tool)
    } else {
        Err(WorkspaceError::not_found("tool", id))
    }
}
