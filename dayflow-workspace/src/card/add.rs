//! AddCard command

use super::container_of;
use crate::access;
use crate::context::RequestContext;
use crate::dispatch::{Mutation, MutationTarget};
use crate::error::WorkspaceError;
use crate::order::append_position;
use crate::store::{cards, columns, workspaces};
use crate::types::{Card, CardId, CardKind, ColumnId, WorkspaceId};
use crate::validate;
use dayflow_operations::{async_trait, operation, Execute, ExecutionResult, Value};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Create a card in a column, a workspace backlog, or the caller's hub
///
/// With a column the card goes into that column. With only a workspace it goes
/// into the backlog. With neither it is a personal hub card.
#[operation(
    verb = "add",
    noun = "card",
    description = "Create a card in a column, backlog or the personal hub"
)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddCard {
    /// Card title
    pub title: String,
    /// Workspace for a backlog card
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
    /// Column to add the card to
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    /// Note, link or checklist
    #[serde(default)]
    pub kind: CardKind,
    /// Kind-specific content
    #[serde(default)]
    pub payload: Option<Value>,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Insert here instead of appending; clamped to the container
    #[serde(default)]
    pub position: Option<i64>,
}

impl AddCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            workspace_id: None,
            column_id: None,
            kind: CardKind::default(),
            payload: None,
            tags: Vec::new(),
            position: None,
        }
    }

    pub fn in_column(mut self, column_id: impl Into<ColumnId>) -> Self {
        self.column_id = Some(column_id.into());
        self
    }

    pub fn in_backlog(mut self, workspace_id: impl Into<WorkspaceId>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_kind(mut self, kind: CardKind, payload: Value) -> Self {
        self.kind = kind;
        self.payload = Some(payload);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn at_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

impl Mutation for AddCard {
    fn target(&self) -> MutationTarget {
        match (&self.column_id, &self.workspace_id) {
            (Some(column), _) => MutationTarget::Column(column.clone()),
            (None, Some(workspace)) => MutationTarget::Workspace(workspace.clone()),
            (None, None) => MutationTarget::Global,
        }
    }
}

#[async_trait]
impl Execute<RequestContext, WorkspaceError> for AddCard {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let started = Instant::now();

        let result = async {
            let user = ctx.require_user()?;
            let limits = ctx.limits();
            let title = validate::title("title", &self.title, limits.max_title_length)?;
            let payload = self
                .kind
                .validate_payload(self.payload.as_ref().unwrap_or(&self.kind.empty_payload()))
                .map_err(|message| WorkspaceError::invalid_value("payload", message))?;
            let now = ctx.now();

            let card = ctx.write(|conn| {
                let workspace_id = match (&self.column_id, &self.workspace_id) {
                    (Some(column_id), requested) => {
                        let column = columns::get(conn, column_id)?
                            .ok_or_else(|| WorkspaceError::not_found("column", column_id))?;
                        if requested.as_ref().is_some_and(|ws| *ws != column.workspace_id) {
                            return Err(WorkspaceError::invalid_target(
                                "column belongs to a different workspace",
                            ));
                        }
                        access::require_access(conn, &column.workspace_id, user)?;
                        Some(column.workspace_id)
                    }
                    (None, Some(workspace_id)) => {
                        access::require_access(conn, workspace_id, user)?;
                        Some(workspace_id.clone())
                    }
                    (None, None) => None,
                };

                let owned = cards::count_owned(conn, user)?;
                validate::within_limit("cards", owned, limits.max_cards_per_user)?;

                let mut card = Card {
                    id: CardId::new(),
                    owner_id: user.clone(),
                    workspace_id,
                    column_id: self.column_id.clone(),
                    title,
                    done: false,
                    tags: validate::tags(&self.tags),
                    kind: self.kind,
                    payload,
                    order: 0,
                    created_at: now,
                    updated_at: now,
                };
                let container = container_of(&card);
                card.order = append_position(container.len(conn)?);
                cards::insert(conn, &card)?;
                if let Some(position) = self.position {
                    container.insert_at(conn, card.id.as_str(), position)?;
                }
                if let Some(workspace_id) = &card.workspace_id {
                    workspaces::touch(conn, workspace_id, now)?;
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
