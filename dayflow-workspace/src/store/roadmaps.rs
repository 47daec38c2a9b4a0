//! Roadmap and roadmap node rows

use crate::db::{from_millis, position_column, to_millis};
use crate::error::Result;
use crate::types::{Roadmap, RoadmapId, RoadmapNode, RoadmapNodeId, WorkspaceId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ROADMAP_COLUMNS: &str = "id, workspace_id, owner_id, title, source_text, created_at";
const NODE_COLUMNS: &str = "id, roadmap_id, parent_id, title, done, position";

fn roadmap_from_row(row: &Row<'_>) -> rusqlite::Result<Roadmap> {
    Ok(Roadmap {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        owner_id: row.get(2)?,
        title: row.get(3)?,
        source_text: row.get(4)?,
        created_at: from_millis(row.get(5)?),
    })
}

fn node_from_row(row: &Row<'_>) -> rusqlite::Result<RoadmapNode> {
    Ok(RoadmapNode {
        id: row.get(0)?,
        roadmap_id: row.get(1)?,
        parent_id: row.get(2)?,
        title: row.get(3)?,
        done: row.get(4)?,
        order: position_column(row, 5)?,
    })
}

pub fn insert(conn: &Connection, roadmap: &Roadmap) -> Result<()> {
    conn.execute(
        "INSERT INTO roadmaps (id, workspace_id, owner_id, title, source_text, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            roadmap.id,
            roadmap.workspace_id,
            roadmap.owner_id,
            roadmap.title,
            roadmap.source_text,
            to_millis(roadmap.created_at)
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &RoadmapId) -> Result<Option<Roadmap>> {
    let sql = format!("SELECT {ROADMAP_COLUMNS} FROM roadmaps WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], roadmap_from_row)
        .optional()?)
}

pub fn get_for_workspace(conn: &Connection, workspace_id: &WorkspaceId) -> Result<Option<Roadmap>> {
    let sql = format!("SELECT {ROADMAP_COLUMNS} FROM roadmaps WHERE workspace_id = ?1");
    Ok(conn
        .query_row(&sql, params![workspace_id], roadmap_from_row)
        .optional()?)
}

/// Delete a roadmap; its nodes go with it
pub fn delete(conn: &Connection, id: &RoadmapId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM roadmaps WHERE id = ?1", params![id])? > 0)
}

pub fn insert_node(conn: &Connection, node: &RoadmapNode, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO roadmap_nodes (id, roadmap_id, parent_id, title, done, position, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            node.id,
            node.roadmap_id,
            node.parent_id,
            node.title,
            node.done,
            node.order as i64,
            to_millis(now)
        ],
    )?;
    Ok(())
}

pub fn get_node(conn: &Connection, id: &RoadmapNodeId) -> Result<Option<RoadmapNode>> {
    let sql = format!("SELECT {NODE_COLUMNS} FROM roadmap_nodes WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], node_from_row)
        .optional()?)
}

pub fn update_node(conn: &Connection, node: &RoadmapNode) -> Result<()> {
    conn.execute(
        "UPDATE roadmap_nodes SET title = ?1, done = ?2 WHERE id = ?3",
        params![node.title, node.done, node.id],
    )?;
    Ok(())
}

/// Delete a node; its whole subtree goes with it
pub fn delete_node(conn: &Connection, id: &RoadmapNodeId) -> Result<bool> {
    Ok(conn.execute("DELETE FROM roadmap_nodes WHERE id = ?1", params![id])? > 0)
}

/// Every node of a roadmap as a flat list
pub fn list_nodes(conn: &Connection, roadmap_id: &RoadmapId) -> Result<Vec<RoadmapNode>> {
    let sql = format!(
        "SELECT {NODE_COLUMNS} FROM roadmap_nodes WHERE roadmap_id = ?1 ORDER BY position, created_at, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![roadmap_id], node_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count_nodes(conn: &Connection, roadmap_id: &RoadmapId) -> Result<u32> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM roadmap_nodes WHERE roadmap_id = ?1",
        params![roadmap_id],
        |row| row.get(0),
    )?)
}
