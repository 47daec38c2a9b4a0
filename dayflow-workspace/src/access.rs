//! Access guard: who may see and change a workspace
//!
//! The owner and members have access. Everyone else is treated as if the
//! workspace did not exist.

use crate::error::{Result, WorkspaceError};
use crate::store::workspaces;
use crate::types::{UserId, Workspace, WorkspaceId};
use rusqlite::{params, Connection};

/// Owner or member
pub fn has_access(conn: &Connection, workspace_id: &WorkspaceId, user_id: &UserId) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM workspaces w WHERE w.id = ?1 AND (w.owner_id = ?2 OR EXISTS \
         (SELECT 1 FROM workspace_members m WHERE m.workspace_id = w.id AND m.user_id = ?2)))",
        params![workspace_id, user_id],
        |row| row.get(0),
    )?)
}

/// The workspace, if the user has access; `NotFound` otherwise
pub fn require_access(
    conn: &Connection,
    workspace_id: &WorkspaceId,
    user_id: &UserId,
) -> Result<Workspace> {
    let workspace = workspaces::get(conn, workspace_id)?
        .ok_or_else(|| WorkspaceError::not_found("workspace", workspace_id))?;
    if workspace.owner_id == *user_id || workspaces::is_member(conn, workspace_id, user_id)? {
        Ok(workspace)
    } else {
        Err(WorkspaceError::not_found("workspace", workspace_id))
    }
}

/// The workspace, if the user owns it
///
/// Outsiders get `NotFound`; members who are not the owner get `Forbidden`.
pub fn require_owner(
    conn: &Connection,
    workspace_id: &WorkspaceId,
    user_id: &UserId,
    action: &str,
) -> Result<Workspace> {
    let workspace = require_access(conn, workspace_id, user_id)?;
    if workspace.owner_id == *user_id {
        Ok(workspace)
    } else {
        Err(WorkspaceError::forbidden(format!("only the workspace owner can {action}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::users;
    use crate::types::User;
    use chrono::Utc;

    fn seed(conn: &Connection) -> (Workspace, UserId, UserId, UserId) {
        let mut ids = Vec::new();
        for name in ["owner", "member", "outsider"] {
            let user = User {
                id: UserId::from(name),
                email: format!("{name}@example.com"),
                display_name: name.to_string(),
                avatar_url: None,
                created_at: Utc::now(),
            };
            users::insert(conn, &user).unwrap();
            ids.push(user.id);
        }
        let workspace = Workspace {
            id: WorkspaceId::from("w"),
            owner_id: ids[0].clone(),
            title: "Board".into(),
            description: None,
            icon: None,
            editing_by: None,
            editing_at: None,
            invite_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        workspaces::insert(conn, &workspace).unwrap();
        workspaces::add_member(conn, &workspace.id, &ids[1], Utc::now()).unwrap();
        (workspace, ids[0].clone(), ids[1].clone(), ids[2].clone())
    }

    #[test]
    fn test_owner_and_member_have_access() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, owner, member, outsider) = seed(conn);
            assert!(has_access(conn, &ws.id, &owner)?);
            assert!(has_access(conn, &ws.id, &member)?);
            assert!(!has_access(conn, &ws.id, &outsider)?);
            assert!(!has_access(conn, &WorkspaceId::from("missing"), &owner)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_outsider_sees_not_found() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, _owner, _member, outsider) = seed(conn);
            let err = require_access(conn, &ws.id, &outsider).unwrap_err();
            assert!(matches!(err, WorkspaceError::NotFound { .. }));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_require_owner_distinguishes_member_and_outsider() {
        let db = Database::open_in_memory().unwrap();
        db.write(|conn| {
            let (ws, owner, member, outsider) = seed(conn);
            assert!(require_owner(conn, &ws.id, &owner, "delete it").is_ok());
            assert!(matches!(
                require_owner(conn, &ws.id, &member, "delete it"),
                Err(WorkspaceError::Forbidden { .. })
            ));
            assert!(matches!(
                require_owner(conn, &ws.id, &outsider, "delete it"),
                Err(WorkspaceError::NotFound { .. })
            ));
            Ok(())
        })
        .unwrap();
    }
}
