//! Containers backed by SQLite rows

use super::plan::{self, PlanError};
use crate::error::{Result, WorkspaceError};
use crate::types::{ColumnId, RoadmapId, RoadmapNodeId, UserId, WorkspaceId};
use rusqlite::{params, Connection, ToSql};
use tracing::trace;

/// An ordered collection whose members keep orders `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// Cards of a column
    Column(ColumnId),
    /// Cards of a workspace that are in no column
    Backlog(WorkspaceId),
    /// A user's own cards outside every workspace
    Hub(UserId),
    /// Columns of a workspace
    Columns(WorkspaceId),
    /// Roadmap nodes sharing a parent (`None` for top level)
    RoadmapLevel {
        roadmap: RoadmapId,
        parent: Option<RoadmapNodeId>,
    },
}

impl Container {
    fn table(&self) -> &'static str {
        match self {
            Container::Column(_) | Container::Backlog(_) | Container::Hub(_) => "cards",
            Container::Columns(_) => "columns",
            Container::RoadmapLevel { .. } => "roadmap_nodes",
        }
    }

    fn filter(&self) -> (&'static str, Vec<&dyn ToSql>) {
        match self {
            Container::Column(id) => ("column_id = ?1", vec![id as &dyn ToSql]),
            Container::Backlog(id) => (
                "workspace_id = ?1 AND column_id IS NULL",
                vec![id as &dyn ToSql],
            ),
            Container::Hub(id) => (
                "owner_id = ?1 AND workspace_id IS NULL AND column_id IS NULL",
                vec![id as &dyn ToSql],
            ),
            Container::Columns(id) => ("workspace_id = ?1", vec![id as &dyn ToSql]),
            Container::RoadmapLevel { roadmap, parent } => (
                "roadmap_id = ?1 AND parent_id IS ?2",
                vec![roadmap as &dyn ToSql, parent as &dyn ToSql],
            ),
        }
    }

    /// Members with their stored orders, in display order
    pub fn load(&self, conn: &Connection) -> Result<Vec<(String, usize)>> {
        let (filter, args) = self.filter();
        let sql = format!(
            "SELECT id, position FROM {} WHERE {filter} ORDER BY position, created_at, id",
            self.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args.as_slice(), |row| {
            let id: String = row.get(0)?;
            let position: i64 = row.get(1)?;
            Ok((id, usize::try_from(position).unwrap_or(0)))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Member ids in display order
    pub fn ids(&self, conn: &Connection) -> Result<Vec<String>> {
        Ok(self.load(conn)?.into_iter().map(|(id, _)| id).collect())
    }

    pub fn len(&self, conn: &Connection) -> Result<usize> {
        let (filter, args) = self.filter();
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {filter}", self.table());
        let count: i64 = conn.query_row(&sql, args.as_slice(), |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Store `planned` as the new sequence, writing only rows whose order changed
    fn write(
        &self,
        conn: &Connection,
        current: &[(String, usize)],
        planned: &[String],
    ) -> Result<usize> {
        let changes = plan::changed_positions(current, planned);
        let sql = format!("UPDATE {} SET position = ?1 WHERE id = ?2", self.table());
        let mut stmt = conn.prepare(&sql)?;
        for (id, position) in &changes {
            stmt.execute(params![*position as i64, id])?;
        }
        trace!(container = ?self, written = changes.len(), "renumbered container");
        Ok(changes.len())
    }

    /// Close any gaps, e.g. after a member was deleted
    pub fn compact(&self, conn: &Connection) -> Result<usize> {
        let current = self.load(conn)?;
        let planned: Vec<String> = current.iter().map(|(id, _)| id.clone()).collect();
        self.write(conn, &current, &planned)
    }

    /// Move a member to `target` (clamped) within this container
    pub fn reorder(&self, conn: &Connection, id: &str, target: i64) -> Result<usize> {
        let current = self.load(conn)?;
        let ids: Vec<String> = current.iter().map(|(id, _)| id.clone()).collect();
        let planned = plan::plan_reorder(&ids, &id.to_string(), target)
            .ok_or_else(|| WorkspaceError::invalid_target(format!("{id} is not in this list")))?;
        self.write(conn, &current, &planned)
    }

    /// Apply an explicit order; unlisted members follow the listed ones
    pub fn reorder_explicit(&self, conn: &Connection, listed: &[String]) -> Result<usize> {
        let current = self.load(conn)?;
        let ids: Vec<String> = current.iter().map(|(id, _)| id.clone()).collect();
        let planned = plan::plan_explicit(&ids, listed).map_err(|e| match e {
            PlanError::UnknownMember(_) => WorkspaceError::invalid_target(e.to_string()),
            PlanError::DuplicateMember(_) => WorkspaceError::invalid_value("ids", e.to_string()),
        })?;
        self.write(conn, &current, &planned)
    }

    /// Place a member that was just added to this container (its row already
    /// points here) at `target`, clamped to `[0, len]`
    pub fn insert_at(&self, conn: &Connection, id: &str, target: i64) -> Result<usize> {
        let current: Vec<(String, usize)> = self
            .load(conn)?
            .into_iter()
            .filter(|(member, _)| member != id)
            .collect();
        let ids: Vec<String> = current.iter().map(|(id, _)| id.clone()).collect();
        let planned = plan::plan_insert(&ids, id.to_string(), target);
        self.write(conn, &current, &planned)
    }
}

/// Orders of every member, for checking density in tests and diagnostics
pub fn orders(conn: &Connection, container: &Container) -> Result<Vec<usize>> {
    Ok(container.load(conn)?.into_iter().map(|(_, order)| order).collect())
}
