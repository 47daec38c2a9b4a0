//! UpdateCard command

use super::require_card;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::store::{cards, workspaces};
use crate::types::CardId;
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Edit a card's title, done flag, tags or payload. The kind is fixed at creation.
#[operation(
    verb = "update",
    noun = "card",
    description = "Edit a card's title, done flag, tags or payload"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateCard {
    /// Card to edit
    pub card_id: CardId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New done flag
    #[serde(default)]
    pub done: Option<bool>,
    /// Replacement tag list
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Replacement kind-specific content
    #[serde(default)]
    pub payload: Option<Value>,
}

impl UpdateCard {
    pub fn new(card_id: impl Into<CardId>) -> Self {
        Self {
            card_id: card_id.into(),
            title: None,
            done: None,
            tags: None,
            payload: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl Mutation for UpdateCard {
    fn target(&self) -> MutationTarget {
        MutationTarget::Card(self.card_id.clone())
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for UpdateCard {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let now = ctx.now();
            let card = ctx.write(|conn| {
                let mut card = require_card(conn, &self.card_id, user)?;
                if let Some(title) = &self.title {
                    card.title = validate::title("title", title, ctx.limits().max_title_length)?;
                }
                if let Some(done) = self.done {
                    card.done = done;
                }
                if let Some(tags) = &self.tags {
                    card.tags = validate::tags(tags);
                }
                if let Some(payload) = &self.payload {
                    card.payload = card
                        .kind
                        .validate_payload(payload)
                        .map_err(|message| WorkspaceError::invalid_value("payload", message))?;
                }
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
