//! Card commands
//!
//! A card lives in exactly one container: a column, its workspace's backlog,
//! or its owner's hub when it belongs to no workspace.

mod add;
mod delete;
mod mv;
mod toggle;
mod update;

pub use add::AddCard;
pub use delete::DeleteCard;
pub use mv::MoveCard;
pub use toggle::ToggleCard;
pub use update::UpdateCard;

use crate::access;
use crate::error::{Result, WorkspaceError};
use crate::order::Container;
use crate::store::cards;
use crate::types::{Card, CardId, UserId};
use rusqlite::Connection;

/// The container a card currently sits in
pub fn container_of(card: &Card) -> Container {
    match (&card.workspace_id, &card.column_id) {
        (_, Some(column)) => Container::Column(column.clone()),
        (Some(workspace), None) => Container::Backlog(workspace.clone()),
        (None, None) => Container::Hub(card.owner_id.clone()),
    }
}

/// The card, if `user` may see it: hub cards only by their owner, workspace
/// cards by anyone with access to the workspace
pub(crate) fn require_card(conn: &Connection, id: &CardId, user: &UserId) -> Result<Card> {
    let card = cards::get(conn, id)?.ok_or_else(|| WorkspaceError::not_found("card", id))?;
    let visible = match &card.workspace_id {
        Some(workspace) => access::has_access(conn, workspace, user)?,
        None => card.owner_id == *user,
    };
    if visible {
        Ok(card)
    } else {
        Err(WorkspaceError::not_found("card", id))
    }
}
