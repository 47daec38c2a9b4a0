//! MoveCard command

use super::{container_of, require_card};
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::Container;
use crate::store::{cards, columns, workspaces};
use crate::types::{CardId, ColumnId};
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Move a card to `position` in a column, or in its workspace's backlog when
/// `column_id` is omitted
///
/// Positions are clamped. Hub cards can only be reordered within the hub.
#[operation(
    verb = "move",
    noun = "card",
    description = "Move a card to a position in a column or the backlog"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveCard {
    /// Card to move
    pub card_id: CardId,
    /// Destination column; `None` targets the backlog, or the hub for hub cards
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    /// Target index in the destination, clamped to its bounds
    pub position: i64,
}

impl MoveCard {
    /// Move into a column
    pub fn to_column(
        card_id: impl Into<CardId>,
        column_id: impl Into<ColumnId>,
        position: i64,
    ) -> Self {
        Self {
            card_id: card_id.into(),
            column_id: Some(column_id.into()),
            position,
        }
    }

    /// Move into the backlog (or reorder within the hub for hub cards)
    pub fn to_backlog(card_id: impl Into<CardId>, position: i64) -> Self {
        Self {
            card_id: card_id.into(),
            column_id: None,
            position,
        }
    }
}

impl Mutation for MoveCard {
    fn target(&self) -> MutationTarget {
        MutationTarget::Card(self.card_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for MoveCard {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let card = ctx.write(|conn| {
                let card = require_card(conn, &self.card_id, user)?;
                let source = container_of(&card);

                let destination = match (&card.workspace_id, &self.column_id) {
                    (None, None) => source.clone(),
                    (None, Some(_)) => {
                        return Err(WorkspaceError::invalid_target(
                            "hub cards can only be reordered within the hub",
                        ))
                    }
                    (Some(workspace_id), None) => Container::Backlog(workspace_id.clone()),
                    (Some(workspace_id), Some(column_id)) => {
                        let column = columns::get(conn, column_id)?;
                        match column {
                            Some(column) if column.workspace_id == *workspace_id => {
                                Container::Column(column.id)
                            }
                            _ => {
                                return Err(WorkspaceError::invalid_target(format!(
                                    "column {column_id} is not in this workspace"
                                )))
                            }
                        }
                    }
                };

                let written = if destination == source {
                    source.reorder(conn, card.id.as_str(), self.position)?
                } else {
                    cards::set_container(
                        conn,
                        &card.id,
                        card.workspace_id.as_ref(),
                        self.column_id.as_ref(),
                    )?;
                    source.compact(conn)?
                        + destination.insert_at(conn, card.id.as_str(), self.position)?
                };
                debug!(card_id = %card.id, ?source, ?destination, written, "moved card");

                if written > 0 {
                    if let Some(workspace_id) = &card.workspace_id {
                        workspaces::touch(conn, workspace_id, now)?;
                    }
                }
                cards::get(conn, &card.id)?
                    .ok_or_else(|| WorkspaceError::not_found("card", &card.id))
            })?;
            Ok(serde_json::to_value(&card)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AddCard;
    use crate::column::AddColumn;
    use crate::order::{is_dense, orders};
    use crate::test_support::{setup, TestBed};

    async fn add_card(bed: &TestBed, title: &str, column: &ColumnId) -> CardId {
        let result = AddCard::new(title)
            .in_column(column.clone())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        CardId::from(result["id"].as_str().unwrap())
    }

    fn titles(bed: &TestBed, container: &Container) -> Vec<String> {
        bed.ctx
            .db()
            .read(|conn| {
                let mut titles = Vec::new();
                for id in container.ids(conn)? {
                    let card = cards::get(conn, &CardId::from(id))?.unwrap();
                    titles.push(card.title);
                }
                Ok(titles)
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_reorder_within_column() {
        let bed = setup().await;
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(add_card(&bed, title, &bed.column).await);
        }

        MoveCard::to_column(ids[2].clone(), bed.column.clone(), 0)
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let column = Container::Column(bed.column.clone());
        assert_eq!(titles(&bed, &column), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_move_across_columns_clamps_and_stays_dense() {
        let bed = setup().await;
        let done = AddColumn::new(bed.workspace.clone(), "Done")
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        let done = ColumnId::from(done["id"].as_str().unwrap());

        let a = add_card(&bed, "a", &bed.column).await;
        add_card(&bed, "b", &bed.column).await;
        add_card(&bed, "x", &done).await;

        let moved = MoveCard::to_column(a, done.clone(), 99)
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(moved["order"], 1);
        assert_eq!(moved["column_id"], done.as_str());

        let (source, destination) = bed
            .ctx
            .db()
            .read(|conn| {
                Ok((
                    orders(conn, &Container::Column(bed.column.clone()))?,
                    orders(conn, &Container::Column(done.clone()))?,
                ))
            })
            .unwrap();
        assert_eq!(source, vec![0]);
        assert!(is_dense(&destination));
        assert_eq!(destination.len(), 2);
    }

    #[tokio::test]
    async fn test_move_to_backlog_and_back() {
        let bed = setup().await;
        let a = add_card(&bed, "a", &bed.column).await;

        let in_backlog = MoveCard::to_backlog(a.clone(), 0)
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert!(in_backlog["column_id"].is_null());
        assert_eq!(in_backlog["workspace_id"], bed.workspace.as_str());

        let back = MoveCard::to_column(a, bed.column.clone(), -5)
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(back["order"], 0);
    }

    #[tokio::test]
    async fn test_move_into_foreign_column_rejected() {
        let bed = setup().await;
        let a = add_card(&bed, "a", &bed.column).await;
        let result = MoveCard::to_column(a, "elsewhere", 0)
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::InvalidTarget { .. })));
    }

    #[tokio::test]
    async fn test_hub_card_cannot_enter_column() {
        let bed = setup().await;
        let hub = AddCard::new("mine").execute(&bed.alice).await.into_result().unwrap();
        let result = MoveCard::to_column(hub["id"].as_str().unwrap(), bed.column.clone(), 0)
            .execute(&bed.alice)
            .await
            .into_result();
        assert!(matches!(result, Err(WorkspaceError::InvalidTarget { .. })));
    }
}
