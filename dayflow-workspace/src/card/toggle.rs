//! ToggleCard command

use super::require_card;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{cards, workspaces};
use crate::types::CardId;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Flip a card between done and not done
#[operation(verb = "toggle", noun = "card", description = "Mark a card done or not done")]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToggleCard {
    /// Card to toggle
    pub card_id: CardId,
}

impl ToggleCard {
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
        }
    }
}

impl Mutation for ToggleCard {
    fn target(&self) -> MutationTarget {
        MutationTarget::Card(self.card_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for ToggleCard {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let card = ctx.write(|conn| {
                let mut card = require_card(conn, &self.card_id, user)?;
                card.done = !card.done;
                card.updated_at = now;
                cards::update(conn, &card)?;
                if let Some(workspace_id) = &card.workspace_id {
                    workspaces::touch(conn, workspace_id, now)?;
                }
                Ok(card)
            })?;
            Ok(serde_json::to_value(&card)?)
        }
        .await;

        ExecutionResult::logged(self, result, started)
    }
}
