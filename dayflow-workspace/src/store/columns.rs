//! Column rows

use crate::db::{from_millis, position_column, to_millis};
use crate::error::Result;
use crate::types::{Column, ColumnId, WorkspaceId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMN_COLUMNS: &str =
    "id, workspace_id, title, position, hide_completed, color, created_at";

fn column_from_row(row: &Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        title: row.get(2)?,
        order: position_column(row, 3)?,
        hide_completed: row.get(4)?,
        color: row.get(5)?,
        created_at: from_millis(row.get(6)?),
    })
}

pub fn insert(conn: &Connection, column: &Column) -> Result<()> {
    conn.execute(
        "INSERT INTO columns (id, workspace_id, title, position, hide_completed, color, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            column.id,
            column.workspace_id,
            column.title,
            column.order as i64,
            column.hide_completed,
            column.color,
            to_millis(column.created_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &ColumnId) -> Result<Option<Column>> {
    let sql = format!("SELECT {COLUMN_COLUMNS} FROM columns WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], column_from_row)
        .optional()?)
}

pub fn list_in_workspace(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Vec<Column>> {
    let sql = format!(
        "SELECT {COLUMN_COLUMNS} FROM columns WHERE workspace_id = ?1 ORDER BY position, created_at, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![workspace_id], column_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &Connection, column: &Column) -> Result<()> {
    conn.execute(
        "UPDATE columns SET title = ?1, hide_completed = ?2, color = ?3 WHERE id = ?4",
        params![column.title, column.hide_completed, column.color, column.id],
    )?;
    Ok(())
}

/// Delete a column; its cards go with it
pub fn delete(conn: &Connection, id: &ColumnId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM columns WHERE id = ?1", params![id])? > 0)
}
