//! The calls a client makes against a workspace server
//!
//! [`WorkspaceApi`] is the seam between client state and transport. The
//! [`InProcessApi`] implementation runs commands directly against a
//! [`WorkspaceContext`], which is what tests and embedded callers use.

use crate::error::Result;
use async_trait::async_trait;
use dayflow_workspace::card::{AddCard, DeleteCard, MoveCard, UpdateCard};
use dayflow_workspace::column::{AddColumn, DeleteColumn, ReorderColumns, UpdateColumn};
use dayflow_workspace::lock::{AcquireLock, ReleaseLock};
use dayflow_workspace::workspace::{CreateWorkspace, DeleteWorkspace, GetWorkspace};
use dayflow_workspace::{
    Card, CardId, CardKind, Column, ColumnId, RequestContext, UserId, WorkspaceContext,
    WorkspaceId, WorkspaceOperationProcessor, WorkspaceSnapshot,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A card to create, wherever it goes
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
    pub title: String,
    pub workspace_id: Option<WorkspaceId>,
    pub column_id: Option<ColumnId>,
    pub kind: CardKind,
    pub payload: Value,
    pub tags: Vec<String>,
    pub position: Option<i64>,
}

impl NewCard {
    /// Same content and container as `card`, placed at its old order
    pub fn like(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            workspace_id: card.workspace_id.clone(),
            column_id: card.column_id.clone(),
            kind: card.kind,
            payload: card.payload.clone(),
            tags: card.tags.clone(),
            position: i64::try_from(card.order).ok(),
        }
    }

    /// Put the card into `column` instead
    pub fn in_column(mut self, workspace_id: WorkspaceId, column_id: ColumnId) -> Self {
        self.workspace_id = Some(workspace_id);
        self.column_id = Some(column_id);
        self
    }
}

/// Column settings for create and update calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFields {
    pub title: String,
    pub hide_completed: bool,
    pub color: Option<String>,
}

impl From<&Column> for ColumnFields {
    fn from(column: &Column) -> Self {
        Self {
            title: column.title.clone(),
            hide_completed: column.hide_completed,
            color: column.color.clone(),
        }
    }
}

/// Server calls used by [`crate::ClientStore`] and [`crate::UndoAction`]
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Authoritative snapshot of a workspace
    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<WorkspaceSnapshot>;

    async fn create_workspace(
        &self,
        title: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<WorkspaceSnapshot>;

    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<()>;

    async fn acquire_lock(&self, workspace_id: &WorkspaceId) -> Result<()>;

    async fn release_lock(&self, workspace_id: &WorkspaceId) -> Result<()>;

    async fn add_column(&self, workspace_id: &WorkspaceId, fields: &ColumnFields) -> Result<Column>;

    async fn update_column(&self, column_id: &ColumnId, fields: &ColumnFields) -> Result<Column>;

    async fn delete_column(&self, column_id: &ColumnId) -> Result<()>;

    async fn reorder_columns(
        &self,
        workspace_id: &WorkspaceId,
        column_ids: &[ColumnId],
    ) -> Result<()>;

    async fn add_card(&self, card: &NewCard) -> Result<Card>;

    async fn set_card_done(&self, card_id: &CardId, done: bool) -> Result<Card>;

    /// Move a card into `column_id`, or into its workspace backlog when `None`
    async fn move_card(
        &self,
        card_id: &CardId,
        column_id: Option<&ColumnId>,
        position: i64,
    ) -> Result<Card>;

    async fn delete_card(&self, card_id: &CardId) -> Result<()>;
}

/// Runs every call as a command on a local [`WorkspaceContext`]
#[derive(Debug, Clone)]
pub struct InProcessApi {
    ctx: RequestContext,
    processor: WorkspaceOperationProcessor,
}

impl InProcessApi {
    pub fn new(context: Arc<WorkspaceContext>, user: UserId) -> Self {
        Self {
            ctx: RequestContext::authenticated(context, user),
            processor: WorkspaceOperationProcessor::new(),
        }
    }

    /// The user every call is made as
    pub fn user(&self) -> Option<&UserId> {
        self.ctx.user()
    }

    async fn mutate<M>(&self, mutation: &M) -> Result<Value>
    where
        M: dayflow_workspace::Mutation,
    {
        let value = self.processor.mutate(mutation, &self.ctx).await?;
        Ok(value)
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl WorkspaceApi for InProcessApi {
    async fn get_workspace(&self, workspace_id: &WorkspaceId) -> Result<WorkspaceSnapshot> {
        let value = self
            .processor
            .query(&GetWorkspace::new(workspace_id.clone()), &self.ctx)
            .await?;
        Self::decode(value)
    }

    async fn create_workspace(
        &self,
        title: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<WorkspaceSnapshot> {
        let mut command = CreateWorkspace::new(title);
        if let Some(description) = description {
            command = command.with_description(description);
        }
        if let Some(icon) = icon {
            command = command.with_icon(icon);
        }
        Self::decode(self.mutate(&command).await?)
    }

    async fn delete_workspace(&self, workspace_id: &WorkspaceId) -> Result<()> {
        self.mutate(&DeleteWorkspace::new(workspace_id.clone())).await?;
        Ok(())
    }

    async fn acquire_lock(&self, workspace_id: &WorkspaceId) -> Result<()> {
        self.mutate(&AcquireLock::new(workspace_id.clone())).await?;
        Ok(())
    }

    async fn release_lock(&self, workspace_id: &WorkspaceId) -> Result<()> {
        self.mutate(&ReleaseLock::new(workspace_id.clone())).await?;
        Ok(())
    }

    async fn add_column(
        &self,
        workspace_id: &WorkspaceId,
        fields: &ColumnFields,
    ) -> Result<Column> {
        let mut command = AddColumn::new(workspace_id.clone(), fields.title.as_str())
            .with_hide_completed(fields.hide_completed);
        if let Some(color) = &fields.color {
            command = command.with_color(color.as_str());
        }
        Self::decode(self.mutate(&command).await?)
    }

    async fn update_column(&self, column_id: &ColumnId, fields: &ColumnFields) -> Result<Column> {
        let mut command = UpdateColumn::new(column_id.clone())
            .with_title(fields.title.as_str())
            .with_hide_completed(fields.hide_completed);
        if let Some(color) = &fields.color {
            command = command.with_color(color.as_str());
        }
        Self::decode(self.mutate(&command).await?)
    }

    async fn delete_column(&self, column_id: &ColumnId) -> Result<()> {
        self.mutate(&DeleteColumn::new(column_id.clone())).await?;
        Ok(())
    }

    async fn reorder_columns(
        &self,
        workspace_id: &WorkspaceId,
        column_ids: &[ColumnId],
    ) -> Result<()> {
        self.mutate(&ReorderColumns::new(workspace_id.clone(), column_ids.to_vec()))
            .await?;
        Ok(())
    }

    async fn add_card(&self, card: &NewCard) -> Result<Card> {
        let mut command = AddCard::new(card.title.as_str())
            .with_kind(card.kind, card.payload.clone())
            .with_tags(card.tags.clone());
        command.workspace_id = card.workspace_id.clone();
        command.column_id = card.column_id.clone();
        command.position = card.position;
        debug!(title = %card.title, column = ?card.column_id, "adding card");
        Self::decode(self.mutate(&command).await?)
    }

    async fn set_card_done(&self, card_id: &CardId, done: bool) -> Result<Card> {
        Self::decode(
            self.mutate(&UpdateCard::new(card_id.clone()).with_done(done))
                .await?,
        )
    }

    async fn move_card(
        &self,
        card_id: &CardId,
        column_id: Option<&ColumnId>,
        position: i64,
    ) -> Result<Card> {
        let command = match column_id {
            Some(column_id) => MoveCard::to_column(card_id.clone(), column_id.clone(), position),
            None => MoveCard::to_backlog(card_id.clone(), position),
        };
        Self::decode(self.mutate(&command).await?)
    }

    async fn delete_card(&self, card_id: &CardId) -> Result<()> {
        self.mutate(&DeleteCard::new(card_id.clone())).await?;
        Ok(())
    }
}
