//! Workspace lifecycle, listing and sharing commands

mod accept_invite;
mod create;
mod delete;
mod get;
mod invite;
mod list;
mod pin;
mod remove_member;
mod update;

pub use accept_invite::AcceptInvite;
pub use create::CreateWorkspace;
pub use delete::DeleteWorkspace;
pub use get::GetWorkspace;
pub use invite::GenerateInvite;
pub use list::ListWorkspaces;
pub use pin::TogglePin;
pub use remove_member::RemoveMember;
pub use update::UpdateWorkspace;

use crate::error::{Result, WorkspaceError};
use crate::lock::LockManager;
use crate::store::{cards, columns, tools, users, workspaces};
use crate::types::{
    ColumnWithCards, UserId, UserSummary, Workspace, WorkspaceSnapshot, WorkspaceSummary,
};
use rusqlite::Connection;

/// Listing entry for `viewer`, with the lease and pin resolved for them
pub(crate) fn summarize(
    conn: &Connection,
    locks: &LockManager<'_>,
    workspace: &Workspace,
    viewer: &UserId,
) -> Result<WorkspaceSummary> {
    Ok(WorkspaceSummary {
        id: workspace.id.clone(),
        owner_id: workspace.owner_id.clone(),
        title: workspace.title.clone(),
        description: workspace.description.clone(),
        icon: workspace.icon.clone(),
        is_owner: workspace.owner_id == *viewer,
        pinned: workspaces::is_pinned(conn, &workspace.id, viewer)?,
        lease: locks.view(workspace, Some(viewer))?,
        created_at: workspace.created_at,
        updated_at: workspace.updated_at,
    })
}

/// Full board for `viewer`. The invite token is only included for the owner.
pub(crate) fn snapshot(
    conn: &Connection,
    locks: &LockManager<'_>,
    workspace: &Workspace,
    viewer: &UserId,
) -> Result<WorkspaceSnapshot> {
    let summary = summarize(conn, locks, workspace, viewer)?;
    let owner = users::get(conn, &workspace.owner_id)?
        .map(|u| UserSummary::from(&u))
        .ok_or_else(|| WorkspaceError::not_found("user", &workspace.owner_id))?;
    let members = users::members_of(conn, &workspace.id)?
        .iter()
        .map(UserSummary::from)
        .collect();
    let columns = columns::list_in_workspace(conn, &workspace.id)?
        .into_iter()
        .map(|column| {
            Ok(ColumnWithCards {
                cards: cards::list_in_column(conn, &column.id)?,
                column,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkspaceSnapshot {
        invite_token: if summary.is_owner {
            workspace.invite_token.clone()
        } else {
            None
        },
        summary,
        owner,
        members,
        columns,
        backlog: cards::list_backlog(conn, &workspace.id)?,
        tools: tools::list_in_workspace(conn, &workspace.id)?,
    })
}
