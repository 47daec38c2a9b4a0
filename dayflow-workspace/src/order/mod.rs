//! Dense ordering of columns, cards and roadmap nodes
//!
//! Every container keeps its members' orders at exactly `0..n`. Appends take
//! order `n`; reorders, cross-container moves and deletes renumber whatever
//! they touch. Each pass reads the whole container, splices in memory, and
//! writes only the rows whose order changed. Callers run passes inside
//! [`crate::db::Database::write`] so a pass is never observed half-done.

mod container;
pub mod plan;

pub use container::{orders, Container};
pub use plan::{
    append_position, changed_positions, clamp, is_dense, plan_explicit, plan_insert,
    plan_remove, plan_reorder, PlanError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::{cards, columns, users, workspaces};
    use crate::types::{
        Card, CardId, CardKind, Column, ColumnId, User, UserId, Workspace, WorkspaceId,
    };
    use chrono::Utc;
    use rusqlite::Connection;

    fn seed(conn: &Connection) -> (WorkspaceId, ColumnId, ColumnId) {
        let user = User {
            id: UserId::from("u"),
            email: "u@example.com".into(),
            display_name: "U".into(),
            avatar_url: None,
            created_at: Utc::now(),
        };
        users::insert(conn, &user).unwrap();
        let ws = Workspace {
            id: WorkspaceId::from("w"),
            owner_id: user.id.clone(),
            title: "W".into(),
            description: None,
            icon: None,
            editing_by: None,
            editing_at: None,
            invite_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        workspaces::insert(conn, &ws).unwrap();
        for (i, id) in ["a", "b"].iter().enumerate() {
            columns::insert(
                conn,
                &Column {
                    id: ColumnId::from(*id),
                    workspace_id: ws.id.clone(),
                    title: id.to_string(),
                    order: i,
                    hide_completed: false,
                    color: None,
                    created_at: Utc::now(),
                },
            )
            .unwrap();
        }
        (ws.id, ColumnId::from("a"), ColumnId::from("b"))
    }

    fn add_card(conn: &Connection, id: &str, ws: &WorkspaceId, column: &ColumnId) {
        let container = Container::Column(column.clone());
        let order = append_position(container.len(conn).unwrap());
        cards::insert(
            conn,
            &Card {
                id: CardId::from(id),
                owner_id: UserId::from("u"),
                workspace_id: Some(ws.clone()),
                column_id: Some(column.clone()),
                title: id.to_string(),
                done: false,
                tags: vec![],
                kind: CardKind::Note,
                payload: serde_json::json!({}),
                order,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_append_then_reorder_stays_dense() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, a, _) = seed(conn);
            for id in ["c1", "c2", "c3"] {
                add_card(conn, id, &ws, &a);
            }
            let container = Container::Column(a.clone());
            assert_eq!(orders(conn, &container)?, vec![0, 1, 2]);

            let written = container.reorder(conn, "c3", 0)?;
            assert_eq!(written, 3);
            assert_eq!(container.ids(conn)?, vec!["c3", "c1", "c2"]);
            assert!(is_dense(&orders(conn, &container)?));

            // Same position writes nothing
            assert_eq!(container.reorder(conn, "c1", 1)?, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_move_between_columns_keeps_both_dense() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, a, b) = seed(conn);
            for id in ["a1", "a2", "a3"] {
                add_card(conn, id, &ws, &a);
            }
            for id in ["b1", "b2"] {
                add_card(conn, id, &ws, &b);
            }

            cards::set_container(conn, &CardId::from("a2"), Some(&ws), Some(&b))?;
            Container::Column(b.clone()).insert_at(conn, "a2", 1)?;
            Container::Column(a.clone()).compact(conn)?;

            assert_eq!(Container::Column(a.clone()).ids(conn)?, vec!["a1", "a3"]);
            assert_eq!(Container::Column(b.clone()).ids(conn)?, vec!["b1", "a2", "b2"]);
            assert_eq!(orders(conn, &Container::Column(a))?, vec![0, 1]);
            assert_eq!(orders(conn, &Container::Column(b))?, vec![0, 1, 2]);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_explicit_reorder_of_columns() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, _, _) = seed(conn);
            let container = Container::Columns(ws.clone());
            container.reorder_explicit(conn, &["b".to_string()])?;
            assert_eq!(container.ids(conn)?, vec!["b", "a"]);

            let err = container
                .reorder_explicit(conn, &["zzz".to_string()])
                .unwrap_err();
            assert!(matches!(err, crate::WorkspaceError::InvalidTarget { .. }));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_compact_after_delete() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, a, _) = seed(conn);
            for id in ["c1", "c2", "c3"] {
                add_card(conn, id, &ws, &a);
            }
            cards::delete(conn, &CardId::from("c1"))?;
            let container = Container::Column(a);
            assert_eq!(container.compact(conn)?, 2);
            assert_eq!(orders(conn, &container)?, vec![0, 1]);
            Ok(())
        })
        .unwrap();
    }
}
