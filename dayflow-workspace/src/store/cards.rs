//! Card rows

use crate::db::{from_millis, json_column, position_column, to_millis};
use crate::error::Result;
use crate::types::{Card, CardId, CardKind, ColumnId, UserId, WorkspaceId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CARD_COLUMNS: &str = "id, owner_id, workspace_id, column_id, title, done, tags, kind, \
     payload, position, created_at, updated_at";

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    let kind: String = row.get(7)?;
    Ok(Card {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        workspace_id: row.get(2)?,
        column_id: row.get(3)?,
        title: row.get(4)?,
        done: row.get(5)?,
        tags: json_column(row, 6)?,
        kind: CardKind::parse(&kind).unwrap_or_default(),
        payload: json_column(row, 8)?,
        order: position_column(row, 9)?,
        created_at: from_millis(row.get(10)?),
        updated_at: from_millis(row.get(11)?),
    })
}

fn query_cards(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Card>> {
    let sql = format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE {filter} ORDER BY position, created_at, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, card_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert(conn: &Connection, card: &Card) -> Result<()> {
    conn.execute(
        "INSERT INTO cards (id, owner_id, workspace_id, column_id, title, done, tags, kind, payload, \
         position, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            card.id,
            card.owner_id,
            card.workspace_id,
            card.column_id,
            card.title,
            card.done,
            serde_json::to_string(&card.tags)?,
            card.kind.as_str(),
            serde_json::to_string(&card.payload)?,
            card.order as i64,
            to_millis(card.created_at),
            to_millis(card.updated_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &CardId) -> Result<Option<Card>> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], card_from_row)
        .optional()?)
}

/// Write the editable fields (not the container or position)
pub fn update(conn: &Connection, card: &Card) -> Result<()> {
    conn.execute(
        "UPDATE cards SET title = ?1, done = ?2, tags = ?3, payload = ?4, updated_at = ?5 WHERE id = ?6",
        params![
            card.title,
            card.done,
            serde_json::to_string(&card.tags)?,
            serde_json::to_string(&card.payload)?,
            to_millis(card.updated_at),
            card.id
        ],
    )?;
    Ok(())
}

/// Point a card at another container
pub fn set_container(
    conn: &Connection,
    id: &CardId,
    workspace_id: Option<&WorkspaceId>,
    column_id: Option<&ColumnId>,
) -> Result<()> {
    conn.execute(
        "UPDATE cards SET workspace_id = ?1, column_id = ?2 WHERE id = ?3",
        params![workspace_id, column_id, id],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &CardId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM cards WHERE id = ?1", params![id])? > 0)
}

pub fn list_in_column(conn: &Connection, column_id: &ColumnId) -> Result<Vec<Card>> {
    query_cards(conn, "column_id = ?1", &[column_id])
}

pub fn list_backlog(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Vec<Card>> {
    query_cards(
        conn,
        "workspace_id = ?1 AND column_id IS NULL",
        &[workspace_id],
    )
}

pub fn list_hub(conn: &Connection, owner_id: &UserId) -> Result<Vec<Card>> {
    query_cards(
        conn,
        "owner_id = ?1 AND workspace_id IS NULL AND column_id IS NULL",
        &[owner_id],
    )
}

/// All cards of a workspace, columns and backlog alike
pub fn list_in_workspace(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Vec<Card>> {
    query_cards(conn, "workspace_id = ?1", &[workspace_id])
}

pub fn count_owned(conn: &Connection, owner_id: &UserId) -> Result<u32> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM cards WHERE owner_id = ?1",
        params![owner_id],
        |row| row.get(0),
    )?)
}
