//! Workspace rows, memberships and pins

use crate::db::{from_millis, to_millis};
use crate::error::Result;
use crate::types::{UserId, Workspace, WorkspaceId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const WORKSPACE_COLUMNS: &str = "w.id, w.owner_id, w.title, w.description, w.icon, w.editing_by, \
     w.editing_at, w.invite_token, w.created_at, w.updated_at";

fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    let editing_at: Option<i64> = row.get(6)?;
    Ok(Workspace {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        editing_by: row.get(5)?,
        editing_at: editing_at.map(from_millis),
        invite_token: row.get(7)?,
        created_at: from_millis(row.get(8)?),
        updated_at: from_millis(row.get(9)?),
    })
}

pub fn insert(conn: &Connection, workspace: &Workspace) -> Result<()> {
    conn.execute(
        "INSERT INTO workspaces (id, owner_id, title, description, icon, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            workspace.id,
            workspace.owner_id,
            workspace.title,
            workspace.description,
            workspace.icon,
            to_millis(workspace.created_at),
            to_millis(workspace.updated_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &WorkspaceId) -> Result<Option<Workspace>> {
    let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces w WHERE w.id = ?1");
    Ok(conn
        .query_row(&sql, params![id], workspace_from_row)
        .optional()?)
}

pub fn find_by_invite_token(conn: &Connection, token: &str) -> Result<Option<Workspace>> {
    let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces w WHERE w.invite_token = ?1");
    Ok(conn
        .query_row(&sql, params![token], workspace_from_row)
        .optional()?)
}

/// Workspaces the user owns or is a member of
pub fn list_for_user(conn: &Connection, user_id: &UserId) -> Result<Vec<Workspace>> {
    let sql = format!(
        "SELECT {WORKSPACE_COLUMNS} FROM workspaces w \
         WHERE w.owner_id = ?1 \
            OR EXISTS (SELECT 1 FROM workspace_members m WHERE m.workspace_id = w.id AND m.user_id = ?1) \
         ORDER BY w.created_at DESC, w.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], workspace_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update_details(
    conn: &Connection,
    id: &WorkspaceId,
    title: &str,
    description: Option<&str>,
    icon: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "UPDATE workspaces SET title = ?1, description = ?2, icon = ?3, updated_at = ?4 WHERE id = ?5",
        params![title, description, icon, to_millis(now), id],
    )?;
    Ok(())
}

/// Bump `updated_at` after a content change
pub fn touch(conn: &Connection, id: &WorkspaceId, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE workspaces SET updated_at = ?1 WHERE id = ?2",
        params![to_millis(now), id],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &WorkspaceId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM workspaces WHERE id = ?1", params![id])? > 0)
}

pub fn set_invite_token(conn: &Connection, id: &WorkspaceId, token: &str) -> Result<()> {
    conn.execute(
        "UPDATE workspaces SET invite_token = ?1 WHERE id = ?2",
        params![token, id],
    )?;
    Ok(())
}

pub fn is_member(conn: &Connection, id: &WorkspaceId, user_id: &UserId) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2)",
        params![id, user_id],
        |row| row.get(0),
    )?)
}

/// Returns false when the user already was a member
pub fn add_member(
    conn: &Connection,
    id: &WorkspaceId,
    user_id: &UserId,
    now: DateTime<Utc>,
) -> Result<bool> {
    Ok(conn.execute(
        "INSERT OR IGNORE INTO workspace_members (workspace_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
        params![id, user_id, to_millis(now)],
    )? > 0)
}

pub fn remove_member(conn: &Connection, id: &WorkspaceId, user_id: &UserId) -> Result<bool> {
    conn.execute(
        "DELETE FROM workspace_pins WHERE workspace_id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    Ok(conn.execute(
        "DELETE FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
        params![id, user_id],
    )? > 0)
}

pub fn is_pinned(conn: &Connection, id: &WorkspaceId, user_id: &UserId) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM workspace_pins WHERE workspace_id = ?1 AND user_id = ?2)",
        params![id, user_id],
        |row| row.get(0),
    )?)
}

/// Flip the viewer's pin; returns the new state
pub fn toggle_pin(
    conn: &Connection,
    id: &WorkspaceId,
    user_id: &UserId,
    now: DateTime<Utc>,
) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM workspace_pins WHERE workspace_id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if removed > 0 {
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO workspace_pins (workspace_id, user_id, pinned_at) VALUES (?1, ?2, ?3)",
        params![id, user_id, to_millis(now)],
    )?;
    Ok(true)
}
