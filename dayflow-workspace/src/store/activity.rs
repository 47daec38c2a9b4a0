//! Activity log rows

use crate::db::{from_millis, json_column, to_millis};
use crate::error::Result;
use crate::types::WorkspaceId;
use dayflow_operations::LogEntry;
use rusqlite::{params, Connection, Row};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    let duration_ms: i64 = row.get(6)?;
    Ok(LogEntry {
        id: row.get(0)?,
        scope: row.get(1)?,
        actor: row.get(2)?,
        op: row.get(3)?,
        input: json_column(row, 4)?,
        output: json_column(row, 5)?,
        duration_ms: u64::try_from(duration_ms).unwrap_or(0),
        timestamp: from_millis(row.get(7)?),
    })
}

pub fn append(conn: &Connection, entry: &LogEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO activity (id, workspace_id, actor, op, input, output, duration_ms, timestamp) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id,
            entry.scope,
            entry.actor,
            entry.op,
            serde_json::to_string(&entry.input)?,
            serde_json::to_string(&entry.output)?,
            i64::try_from(entry.duration_ms).unwrap_or(i64::MAX),
            to_millis(entry.timestamp)
        ],
    )?;
    Ok(())
}

/// Most recent entries of a workspace, latest insert first
pub fn list_for_workspace(
    conn: &Connection,
    workspace_id: &WorkspaceId,
    limit: usize,
) -> Result<Vec<LogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, workspace_id, actor, op, input, output, duration_ms, timestamp FROM activity \
         WHERE workspace_id = ?1 ORDER BY rowid DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(
        params![workspace_id, i64::try_from(limit).unwrap_or(i64::MAX)],
        entry_from_row,
    )?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
