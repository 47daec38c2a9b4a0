//! Column commands

mod add;
mod delete;
mod reorder;
mod update;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use reorder::ReorderColumns;
pub use update::UpdateColumn;

use crate::access;
use crate::error::{Result, WorkspaceError};
use crate::store::columns;
use crate::types::{Column, ColumnId, UserId};
use rusqlite::Connection;

/// The column, if `user` can access its workspace
pub(crate) fn require_column(conn: &Connection, id: &ColumnId, user: &UserId) -> Result<Column> {
    let column =
        columns::get(conn, id)?.ok_or_else(|| WorkspaceError::not_found("column", id))?;
    access::require_access(conn, &column.workspace_id, user)
        .map_err(|_| WorkspaceError::not_found("column", id))?;
    Ok(column)
}
