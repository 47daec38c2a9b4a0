//! Optimistic client-side copy of one workspace
//!
//! Each mutation is applied to the local snapshot first, using the same
//! ordering rules as the server, and then sent. A failed call puts back the
//! copy taken before the mutation; a successful one is followed by a fetch and
//! [`patch_workspace`], so the local copy converges on the server's.

use crate::api::WorkspaceApi;
use crate::error::{ApiError, Result};
use crate::reconcile::{patch_workspace, PatchReport};
use crate::undo::{Restored, UndoAction, UndoBuffer};
use dayflow_workspace::order::{plan_explicit, plan_insert, plan_remove, plan_reorder};
use dayflow_workspace::{Card, CardId, ColumnId, WorkspaceId, WorkspaceSnapshot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a card sits in the local snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Column(usize),
    Backlog,
}

/// Local state for the workspace being viewed
pub struct ClientStore<A: WorkspaceApi> {
    api: Arc<A>,
    workspace: Option<WorkspaceSnapshot>,
    undo: UndoBuffer,
}

impl<A: WorkspaceApi> std::fmt::Debug for ClientStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore")
            .field("workspace", &self.workspace.as_ref().map(|w| &w.summary.id))
            .field("undo", &self.undo.peek().map(UndoAction::name))
            .finish()
    }
}

impl<A: WorkspaceApi> ClientStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            workspace: None,
            undo: UndoBuffer::new(),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// The local copy, if a workspace is loaded
    pub fn workspace(&self) -> Option<&WorkspaceSnapshot> {
        self.workspace.as_ref()
    }

    pub fn pending_undo(&self) -> Option<&UndoAction> {
        self.undo.peek()
    }

    /// Replace the local copy with a fresh fetch
    pub async fn load(&mut self, workspace_id: &WorkspaceId) -> Result<&WorkspaceSnapshot> {
        let snapshot = self.api.get_workspace(workspace_id).await?;
        Ok(self.workspace.insert(snapshot))
    }

    /// Fetch and patch the local copy in place
    pub async fn refresh(&mut self) -> Result<PatchReport> {
        let workspace_id = self.loaded()?.summary.id.clone();
        let remote = self.api.get_workspace(&workspace_id).await?;
        let local = self.workspace.get_or_insert_with(|| remote.clone());
        let report = patch_workspace(local, &remote);
        debug!(%workspace_id, patches = report.len(), "reconciled workspace");
        Ok(report)
    }

    /// Move a card to `position` in `column_id`, or in the backlog when `None`
    pub async fn move_card(
        &mut self,
        card_id: &CardId,
        column_id: Option<&ColumnId>,
        position: i64,
    ) -> Result<()> {
        let backup = self.loaded()?.clone();
        let from = {
            let local = self.loaded_mut()?;
            let (slot, card) = find_card(local, card_id)?;
            let (from_column, from_order) = (card.column_id.clone(), card.order);
            let to = match column_id {
                Some(id) => Slot::Column(column_index(local, id)?),
                None => Slot::Backlog,
            };
            apply_move(local, card_id, &slot, &to, position)?;
            (from_column, from_order)
        };

        let result = self.api.move_card(card_id, column_id, position).await;
        let undo = UndoAction::MoveCard {
            card_id: card_id.clone(),
            column_id: from.0,
            order: from.1,
        };
        self.settle(backup, result, Some(undo)).await
    }

    /// Delete a card; it can be brought back with [`Self::undo`]
    pub async fn delete_card(&mut self, card_id: &CardId) -> Result<()> {
        let backup = self.loaded()?.clone();
        let removed = {
            let local = self.loaded_mut()?;
            let (slot, card) = find_card(local, card_id)?;
            let card = card.clone();
            let cards = cards_mut(local, &slot);
            let ids: Vec<CardId> = cards.iter().map(|c| c.id.clone()).collect();
            let planned = plan_remove(&ids, card_id).unwrap_or(ids);
            arrange(cards, &planned);
            card
        };

        let result = self.api.delete_card(card_id).await;
        let undo = UndoAction::DeleteCard { card: removed };
        self.settle(backup, result, Some(undo)).await
    }

    /// Delete a column and its cards
    pub async fn delete_column(&mut self, column_id: &ColumnId) -> Result<()> {
        let backup = self.loaded()?.clone();
        let (workspace_id, removed) = {
            let local = self.loaded_mut()?;
            let index = column_index(local, column_id)?;
            let removed = local.columns.remove(index);
            renumber_columns(local);
            (local.summary.id.clone(), removed)
        };

        let result = self.api.delete_column(column_id).await;
        let undo = UndoAction::DeleteColumn {
            workspace_id,
            column: removed,
        };
        self.settle(backup, result, Some(undo)).await
    }

    /// Put columns in the given order; unlisted ones follow
    pub async fn reorder_columns(&mut self, column_ids: &[ColumnId]) -> Result<()> {
        let backup = self.loaded()?.clone();
        let workspace_id = {
            let local = self.loaded_mut()?;
            let ids: Vec<ColumnId> = local.columns.iter().map(|c| c.column.id.clone()).collect();
            let planned = plan_explicit(&ids, column_ids)?;
            local.columns.sort_by_key(|c| {
                planned
                    .iter()
                    .position(|id| *id == c.column.id)
                    .unwrap_or(usize::MAX)
            });
            renumber_columns(local);
            local.summary.id.clone()
        };

        let result = self.api.reorder_columns(&workspace_id, column_ids).await;
        self.settle(backup, result, None).await
    }

    /// Delete the loaded workspace; the store is empty afterwards
    pub async fn delete_workspace(&mut self) -> Result<()> {
        let snapshot = self.workspace.take().ok_or(ApiError::NotLoaded)?;
        if let Err(error) = self.api.delete_workspace(&snapshot.summary.id).await {
            warn!(workspace_id = %snapshot.summary.id, %error, "delete failed, restoring");
            self.workspace = Some(snapshot);
            return Err(error);
        }
        self.undo.record(UndoAction::DeleteWorkspace { snapshot });
        Ok(())
    }

    /// Reverse the last recorded action, then bring the local copy up to date
    pub async fn undo(&mut self) -> Result<Restored> {
        let restored = self.undo.undo(self.api.as_ref()).await?;
        let synced = match &restored {
            Restored::Workspace(workspace_id) => self.load(workspace_id).await.map(|_| ()),
            _ if self.workspace.is_some() => self.refresh().await.map(|_| ()),
            _ => Ok(()),
        };
        if let Err(error) = synced {
            warn!(action = ?restored, %error, "refresh after undo failed");
        }
        Ok(restored)
    }

    /// Roll back on failure; on success record `undo` and reconcile
    ///
    /// The server has already applied a successful mutation, so a failed
    /// refresh only leaves the optimistic copy in place until the next one.
    async fn settle(
        &mut self,
        backup: WorkspaceSnapshot,
        result: Result<impl Sized>,
        undo: Option<UndoAction>,
    ) -> Result<()> {
        match result {
            Ok(_) => {
                if let Some(action) = undo {
                    self.undo.record(action);
                }
                if let Err(error) = self.refresh().await {
                    warn!(workspace_id = %backup.summary.id, %error, "refresh after mutation failed");
                }
                Ok(())
            }
            Err(error) => {
                warn!(workspace_id = %backup.summary.id, %error, "mutation failed, rolling back");
                self.workspace = Some(backup);
                Err(error)
            }
        }
    }

    fn loaded(&self) -> Result<&WorkspaceSnapshot> {
        self.workspace.as_ref().ok_or(ApiError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut WorkspaceSnapshot> {
        self.workspace.as_mut().ok_or(ApiError::NotLoaded)
    }
}

fn column_index(workspace: &WorkspaceSnapshot, column_id: &ColumnId) -> Result<usize> {
    workspace
        .columns
        .iter()
        .position(|c| c.column.id == *column_id)
        .ok_or_else(|| ApiError::missing("column", column_id))
}

fn find_card<'w>(workspace: &'w WorkspaceSnapshot, card_id: &CardId) -> Result<(Slot, &'w Card)> {
    for (index, column) in workspace.columns.iter().enumerate() {
        if let Some(card) = column.cards.iter().find(|c| c.id == *card_id) {
            return Ok((Slot::Column(index), card));
        }
    }
    workspace
        .backlog
        .iter()
        .find(|c| c.id == *card_id)
        .map(|card| (Slot::Backlog, card))
        .ok_or_else(|| ApiError::missing("card", card_id))
}

fn cards_mut<'w>(workspace: &'w mut WorkspaceSnapshot, slot: &Slot) -> &'w mut Vec<Card> {
    match slot {
        Slot::Column(index) => &mut workspace.columns[*index].cards,
        Slot::Backlog => &mut workspace.backlog,
    }
}

/// Sort `cards` into `planned` order and set each order to its index
fn arrange(cards: &mut Vec<Card>, planned: &[CardId]) {
    cards.retain(|c| planned.contains(&c.id));
    cards.sort_by_key(|c| planned.iter().position(|id| *id == c.id).unwrap_or(usize::MAX));
    for (index, card) in cards.iter_mut().enumerate() {
        card.order = index;
    }
}

fn renumber_columns(workspace: &mut WorkspaceSnapshot) {
    for (index, column) in workspace.columns.iter_mut().enumerate() {
        column.column.order = index;
    }
}

fn apply_move(
    workspace: &mut WorkspaceSnapshot,
    card_id: &CardId,
    from: &Slot,
    to: &Slot,
    position: i64,
) -> Result<()> {
    if from == to {
        let cards = cards_mut(workspace, from);
        let ids: Vec<CardId> = cards.iter().map(|c| c.id.clone()).collect();
        let planned = plan_reorder(&ids, card_id, position)
            .ok_or_else(|| ApiError::missing("card", card_id))?;
        arrange(cards, &planned);
        return Ok(());
    }

    let source = cards_mut(workspace, from);
    let at = source
        .iter()
        .position(|c| c.id == *card_id)
        .ok_or_else(|| ApiError::missing("card", card_id))?;
    let mut card = source.remove(at);
    let remaining: Vec<CardId> = source.iter().map(|c| c.id.clone()).collect();
    arrange(source, &remaining);

    card.column_id = match to {
        Slot::Column(index) => Some(workspace.columns[*index].column.id.clone()),
        Slot::Backlog => None,
    };
    let destination = cards_mut(workspace, to);
    let ids: Vec<CardId> = destination.iter().map(|c| c.id.clone()).collect();
    let planned = plan_insert(&ids, card.id.clone(), position);
    destination.push(card);
    arrange(destination, &planned);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dayflow_workspace::{
        CardKind, Column, ColumnWithCards, LeaseView, UserId, UserSummary, WorkspaceSummary,
    };
    use serde_json::json;

    fn card(id: &str, column: Option<&str>, order: usize) -> Card {
        Card {
            id: CardId::from(id),
            owner_id: UserId::from("alice"),
            workspace_id: Some(WorkspaceId::from("ws")),
            column_id: column.map(ColumnId::from),
            title: id.to_string(),
            done: false,
            tags: vec![],
            kind: CardKind::Note,
            payload: json!({}),
            order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn board() -> WorkspaceSnapshot {
        let column = |id: &str, order: usize, cards: Vec<Card>| ColumnWithCards {
            column: Column {
                id: ColumnId::from(id),
                workspace_id: WorkspaceId::from("ws"),
                title: id.to_string(),
                order,
                hide_completed: false,
                color: None,
                created_at: Utc::now(),
            },
            cards,
        };
        let owner = UserSummary {
            id: UserId::from("alice"),
            display_name: "Alice".into(),
            avatar_url: None,
        };
        WorkspaceSnapshot {
            summary: WorkspaceSummary {
                id: WorkspaceId::from("ws"),
                owner_id: owner.id.clone(),
                title: "Board".into(),
                description: None,
                icon: None,
                is_owner: true,
                pinned: false,
                lease: LeaseView::default(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            owner,
            members: vec![],
            columns: vec![
                column(
                    "todo",
                    0,
                    vec![
                        card("a", Some("todo"), 0),
                        card("b", Some("todo"), 1),
                        card("c", Some("todo"), 2),
                    ],
                ),
                column("done", 1, vec![card("d", Some("done"), 0)]),
            ],
            backlog: vec![card("e", None, 0)],
            tools: vec![],
            invite_token: None,
        }
    }

    fn ids(cards: &[Card]) -> Vec<(&str, usize)> {
        cards.iter().map(|c| (c.id.as_str(), c.order)).collect()
    }

    #[test]
    fn test_local_reorder_within_column() {
        let mut ws = board();
        let a = CardId::from("a");
        apply_move(&mut ws, &a, &Slot::Column(0), &Slot::Column(0), 2).unwrap();
        assert_eq!(
            ids(&ws.columns[0].cards),
            vec![("b", 0), ("c", 1), ("a", 2)]
        );
    }

    #[test]
    fn test_local_move_across_columns_keeps_both_dense() {
        let mut ws = board();
        let b = CardId::from("b");
        apply_move(&mut ws, &b, &Slot::Column(0), &Slot::Column(1), 0).unwrap();
        assert_eq!(ids(&ws.columns[0].cards), vec![("a", 0), ("c", 1)]);
        assert_eq!(ids(&ws.columns[1].cards), vec![("b", 0), ("d", 1)]);
        assert_eq!(
            ws.columns[1].cards[0].column_id,
            Some(ColumnId::from("done"))
        );
    }

    #[test]
    fn test_local_move_to_backlog_clamps() {
        let mut ws = board();
        let d = CardId::from("d");
        apply_move(&mut ws, &d, &Slot::Column(1), &Slot::Backlog, 99).unwrap();
        assert!(ws.columns[1].cards.is_empty());
        assert_eq!(ids(&ws.backlog), vec![("e", 0), ("d", 1)]);
        assert_eq!(ws.backlog[1].column_id, None);
    }

    #[test]
    fn test_find_card_reports_missing() {
        let ws = board();
        assert!(matches!(
            find_card(&ws, &CardId::from("zzz")),
            Err(ApiError::Missing { resource: "card", .. })
        ));
        assert_eq!(find_card(&ws, &CardId::from("e")).unwrap().0, Slot::Backlog);
    }
}
