//! DeleteCard command

use super::{container_of, require_card};
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{cards, workspaces};
use crate::types::CardId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Delete a card; the rest of its container closes up
#[operation(verb = "delete", noun = "card", description = "Delete a card")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteCard {
    /// Card to delete
    pub card_id: CardId,
}

impl DeleteCard {
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
        }
    }
}

impl Mutation for DeleteCard {
    fn target(&self) -> MutationTarget {
        MutationTarget::Card(self.card_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for DeleteCard {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let card = ctx.write(|conn| {
                let card = require_card(conn, &self.card_id, user)?;
                cards::delete(conn, &card.id)?;
                container_of(&card).compact(conn)?;
                if let Some(workspace_id) = &card.workspace_id {
                    workspaces::touch(conn, workspace_id, now)?;
                }
                Ok(card)
            })?;
            Ok(serde_json::json!({
                "deleted": true,
                "id": self.card_id,
                "card": card,
            }))
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AddCard;
    use crate::order::{orders, Container};
    use crate::test_support::setup;

    #[tokio::test]
    async fn test_delete_renumbers_siblings() {
        let bed = setup().await;
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            let card = AddCard::new(title)
                .in_column(bed.column.clone())
                .execute(&bed.alice)
                .await
                .into_result()
                .unwrap();
            ids.push(card["id"].as_str().unwrap().to_string());
        }

        let result = DeleteCard::new(ids[0].as_str())
            .execute(&bed.alice)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["card"]["title"], "a");

        let remaining = bed
            .ctx
            .db()
            .read(|conn| orders(conn, &Container::Column(bed.column.clone())))
            .unwrap();
        assert_eq!(remaining, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_delete_missing_card() {
        let bed = setup().await;
        let result = DeleteCard::new("missing").execute(&bed.alice).await.into_result();
        assert!(matches!(result, Err(WorkspaceError::NotFound { .. })));
    }
}
