//! One-shot undo of the last destructive client action

use crate::api::{ColumnFields, NewCard, WorkspaceApi};
use crate::error::{ApiError, Result};
use dayflow_workspace::order::plan_insert;
use dayflow_workspace::{Card, CardId, ColumnId, ColumnWithCards, WorkspaceId, WorkspaceSnapshot};
use tracing::{debug, info, warn};

/// An action that can be reversed
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// A card was deleted
    DeleteCard { card: Card },
    /// A column was deleted together with its cards
    DeleteColumn {
        workspace_id: WorkspaceId,
        column: ColumnWithCards,
    },
    /// A whole workspace was deleted
    DeleteWorkspace { snapshot: WorkspaceSnapshot },
    /// A card was moved; `column_id` and `order` are where it came from
    MoveCard {
        card_id: CardId,
        column_id: Option<ColumnId>,
        order: usize,
    },
}

/// What an undo brought back
///
/// Restored entities get new ids, so callers pointing at the old ones should
/// switch to these.
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    Card(Card),
    Column {
        column_id: ColumnId,
        cards: Vec<CardId>,
    },
    Workspace(WorkspaceId),
    Moved(Card),
}

impl UndoAction {
    pub fn name(&self) -> &'static str {
        match self {
            UndoAction::DeleteCard { .. } => "delete card",
            UndoAction::DeleteColumn { .. } => "delete column",
            UndoAction::DeleteWorkspace { .. } => "delete workspace",
            UndoAction::MoveCard { .. } => "move card",
        }
    }

    /// Replay the inverse of this action against the server
    pub async fn replay<A: WorkspaceApi + ?Sized>(&self, api: &A) -> Result<Restored> {
        debug!(action = self.name(), "replaying undo");
        match self {
            UndoAction::DeleteCard { card } => {
                let restored = restore_card(api, NewCard::like(card), card.done).await?;
                Ok(Restored::Card(restored))
            }
            UndoAction::DeleteColumn {
                workspace_id,
                column,
            } => {
                let created = api
                    .add_column(workspace_id, &ColumnFields::from(&column.column))
                    .await?;

                // New columns are appended; slide it back to where it was
                let current = api.get_workspace(workspace_id).await?;
                let others: Vec<ColumnId> = current
                    .columns
                    .iter()
                    .map(|c| c.column.id.clone())
                    .filter(|id| *id != created.id)
                    .collect();
                let order = i64::try_from(column.column.order).unwrap_or(i64::MAX);
                let planned = plan_insert(&others, created.id.clone(), order);
                api.reorder_columns(workspace_id, &planned).await?;

                let mut cards = Vec::with_capacity(column.cards.len());
                for card in &column.cards {
                    let new_card = NewCard::like(card)
                        .in_column(workspace_id.clone(), created.id.clone());
                    cards.push(restore_card(api, new_card, card.done).await?.id);
                }
                Ok(Restored::Column {
                    column_id: created.id,
                    cards,
                })
            }
            UndoAction::DeleteWorkspace { snapshot } => {
                let workspace_id = restore_workspace(api, snapshot).await?;
                Ok(Restored::Workspace(workspace_id))
            }
            UndoAction::MoveCard {
                card_id,
                column_id,
                order,
            } => {
                let position = i64::try_from(*order).unwrap_or(i64::MAX);
                let card = api.move_card(card_id, column_id.as_ref(), position).await?;
                Ok(Restored::Moved(card))
            }
        }
    }
}

async fn restore_card<A: WorkspaceApi + ?Sized>(
    api: &A,
    card: NewCard,
    done: bool,
) -> Result<Card> {
    let created = api.add_card(&card).await?;
    if done {
        api.set_card_done(&created.id, true).await
    } else {
        Ok(created)
    }
}

/// Recreate a deleted workspace with its columns and cards
///
/// The new workspace starts with one seeded column, which takes the settings
/// of the first original column. If filling it fails the partial workspace
/// is deleted again.
async fn restore_workspace<A: WorkspaceApi + ?Sized>(
    api: &A,
    snapshot: &WorkspaceSnapshot,
) -> Result<WorkspaceId> {
    let summary = &snapshot.summary;
    let created = api
        .create_workspace(
            &summary.title,
            summary.description.as_deref(),
            summary.icon.as_deref(),
        )
        .await?;
    let workspace_id = created.summary.id.clone();
    let seeded = created.columns.first().map(|c| c.column.id.clone());

    let outcome = async {
        api.acquire_lock(&workspace_id).await?;
        let filled = fill_workspace(api, &workspace_id, seeded, snapshot).await;
        let released = api.release_lock(&workspace_id).await;
        filled.and(released)
    }
    .await;

    if let Err(error) = outcome {
        warn!(%workspace_id, %error, "restore failed, removing partial workspace");
        if let Err(cleanup) = api.delete_workspace(&workspace_id).await {
            warn!(%workspace_id, error = %cleanup, "could not remove partial workspace");
        }
        return Err(error);
    }

    info!(%workspace_id, title = %summary.title, "restored deleted workspace");
    Ok(workspace_id)
}

async fn fill_workspace<A: WorkspaceApi + ?Sized>(
    api: &A,
    workspace_id: &WorkspaceId,
    seeded: Option<ColumnId>,
    snapshot: &WorkspaceSnapshot,
) -> Result<()> {
    let mut seeded = seeded;
    for column in &snapshot.columns {
        let fields = ColumnFields::from(&column.column);
        let column_id = match seeded.take() {
            Some(id) => api.update_column(&id, &fields).await?.id,
            None => api.add_column(workspace_id, &fields).await?.id,
        };
        for card in &column.cards {
            let new_card = NewCard::like(card).in_column(workspace_id.clone(), column_id.clone());
            restore_card(api, new_card, card.done).await?;
        }
    }
    if let Some(unused) = seeded {
        // The original had no columns at all
        api.delete_column(&unused).await?;
    }
    for card in &snapshot.backlog {
        let mut new_card = NewCard::like(card);
        new_card.workspace_id = Some(workspace_id.clone());
        new_card.column_id = None;
        restore_card(api, new_card, card.done).await?;
    }
    Ok(())
}

/// Holds at most one [`UndoAction`]; recording replaces the previous one
#[derive(Debug, Clone, Default)]
pub struct UndoBuffer {
    last: Option<UndoAction>,
}

impl UndoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: UndoAction) {
        debug!(action = action.name(), "recorded undo");
        self.last = Some(action);
    }

    pub fn peek(&self) -> Option<&UndoAction> {
        self.last.as_ref()
    }

    pub fn take(&mut self) -> Option<UndoAction> {
        self.last.take()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Take the pending action and replay it. A failed replay is not put back.
    pub async fn undo<A: WorkspaceApi + ?Sized>(&mut self, api: &A) -> Result<Restored> {
        let action = self.take().ok_or(ApiError::NothingToUndo)?;
        action.replay(api).await
    }
}
