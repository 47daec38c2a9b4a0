//! User rows

use crate::db::{from_millis, to_millis};
use crate::error::Result;
use crate::types::{User, UserId, WorkspaceId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, email, display_name, avatar_url, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        avatar_url: row.get(3)?,
        created_at: from_millis(row.get(4)?),
    })
}

pub fn insert(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, display_name, avatar_url, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.email,
            user.display_name,
            user.avatar_url,
            to_millis(user.created_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &UserId) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], user_from_row)
        .optional()?)
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    Ok(conn
        .query_row(&sql, params![email], user_from_row)
        .optional()?)
}

pub fn update_profile(
    conn: &Connection,
    id: &UserId,
    display_name: &str,
    avatar_url: Option<&str>,
) -> Result<()> {
    conn.execute(
        "UPDATE users SET display_name = ?1, avatar_url = ?2 WHERE id = ?3",
        params![display_name, avatar_url, id],
    )?;
    Ok(())
}

/// Members of a workspace (not including the owner), oldest membership first
pub fn members_of(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email, u.display_name, u.avatar_url, u.created_at \
         FROM users u JOIN workspace_members m ON m.user_id = u.id \
         WHERE m.workspace_id = ?1 ORDER BY m.joined_at, u.id",
    )?;
    let rows = stmt.query_map(params![workspace_id], user_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
