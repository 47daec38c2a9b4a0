//! Tool rows

use crate::db::{from_millis, json_column, to_millis};
use crate::error::Result;
use crate::types::{Tool, ToolId, UserId, WorkspaceId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TOOL_COLUMNS: &str =
    "id, owner_id, workspace_id, title, link, description, icon, tags, created_at";

fn tool_from_row(row: &Row<'_>) -> rusqlite::Result<Tool> {
    Ok(Tool {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        workspace_id: row.get(2)?,
        title: row.get(3)?,
        link: row.get(4)?,
        description: row.get(5)?,
        icon: row.get(6)?,
        tags: json_column(row, 7)?,
        created_at: from_millis(row.get(8)?),
    })
}

pub fn insert(conn: &Connection, tool: &Tool) -> Result<()> {
    conn.execute(
        "INSERT INTO tools (id, owner_id, workspace_id, title, link, description, icon, tags, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tool.id,
            tool.owner_id,
            tool.workspace_id,
            tool.title,
            tool.link,
            tool.description,
            tool.icon,
            serde_json::to_string(&tool.tags)?,
            to_millis(tool.created_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &ToolId) -> Result<Option<Tool>> {
    let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], tool_from_row)
        .optional()?)
}

pub fn update(conn: &Connection, tool: &Tool) -> Result<()> {
    conn.execute(
        "UPDATE tools SET title = ?1, link = ?2, description = ?3, icon = ?4, tags = ?5 WHERE id = ?6",
        params![
            tool.title,
            tool.link,
            tool.description,
            tool.icon,
            serde_json::to_string(&tool.tags)?,
            tool.id
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &ToolId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM tools WHERE id = ?1", params![id])? > 0)
}

/// Tools of a workspace, newest first
pub fn list_in_workspace(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Vec<Tool>> {
    let sql = format!(
        "SELECT {TOOL_COLUMNS} FROM tools WHERE workspace_id = ?1 ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![workspace_id], tool_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Tools in the owner's hub, newest first
pub fn list_hub(conn: &Connection, owner_id: &UserId) -> Result<Vec<Tool>> {
    let sql = format!(
        "SELECT {TOOL_COLUMNS} FROM tools WHERE owner_id = ?1 AND workspace_id IS NULL \
         ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], tool_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count_in_workspace(conn: &Connection, workspace_id: &WorkspaceId) -> Result<u32> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM tools WHERE workspace_id = ?1",
        params![workspace_id],
        |row| row.get(0),
    )?)
}
