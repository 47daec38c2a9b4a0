//! Shared fixtures for unit tests

use crate::context::{RequestContext, WorkspaceContext};
use crate::db::Database;
use crate::processor::WorkspaceOperationProcessor;
use crate::store::{columns, users, workspaces};
use crate::types::{Column, ColumnId, User, UserId, Workspace, WorkspaceId};
use dayflow_common::ManualClock;
use dayflow_config::DayflowConfig;
use std::sync::Arc;

/// Two users and a workspace owned by alice with one "To Do" column
pub(crate) struct TestBed {
    pub ctx: Arc<WorkspaceContext>,
    pub clock: Arc<ManualClock>,
    pub alice_id: UserId,
    pub bob_id: UserId,
    pub alice: RequestContext,
    pub bob: RequestContext,
    pub workspace: WorkspaceId,
    pub column: ColumnId,
}

fn user(id: &str) -> User {
    User {
        id: UserId::from(id),
        email: format!("{id}@example.com"),
        display_name: id.to_string(),
        avatar_url: None,
        created_at: chrono::Utc::now(),
    }
}

pub(crate) async fn setup() -> TestBed {
    setup_with_config(DayflowConfig::default()).await
}

pub(crate) async fn setup_with_config(config: DayflowConfig) -> TestBed {
    let clock = Arc::new(ManualClock::starting_now());
    let db = Database::open_in_memory().unwrap();
    let ctx = Arc::new(WorkspaceContext::with_clock(db, config, clock.clone()));
    let now = ctx.now();

    let alice = user("alice");
    let bob = user("bob");
    let workspace = Workspace {
        id: WorkspaceId::from("ws"),
        owner_id: alice.id.clone(),
        title: "Board".into(),
        description: None,
        icon: None,
        editing_by: None,
        editing_at: None,
        invite_token: None,
        created_at: now,
        updated_at: now,
    };
    let column = Column {
        id: ColumnId::from("todo"),
        workspace_id: workspace.id.clone(),
        title: "To Do".into(),
        order: 0,
        hide_completed: false,
        color: None,
        created_at: now,
    };
    ctx.db()
        .write(|conn| {
            users::insert(conn, &alice)?;
            users::insert(conn, &bob)?;
            workspaces::insert(conn, &workspace)?;
            columns::insert(conn, &column)
        })
        .unwrap();

    TestBed {
        alice: RequestContext::authenticated(ctx.clone(), alice.id.clone()),
        bob: RequestContext::authenticated(ctx.clone(), bob.id.clone()),
        ctx,
        clock,
        alice_id: alice.id,
        bob_id: bob.id,
        workspace: workspace.id,
        column: column.id,
    }
}

impl TestBed {
    /// Make bob a member of the workspace
    pub async fn join_as_bob(&self) {
        let now = self.ctx.now();
        self.ctx
            .db()
            .write(|conn| workspaces::add_member(conn, &self.workspace, &self.bob_id, now))
            .unwrap();
    }

    /// Give `user` the editing lease directly
    pub fn lock_for(&self, user: &UserId) {
        let acquired = self
            .ctx
            .db()
            .write(|conn| self.ctx.locks(conn).acquire(&self.workspace, user))
            .unwrap();
        assert!(acquired, "lease should be free for {user}");
    }

    pub fn processor(&self) -> WorkspaceOperationProcessor {
        WorkspaceOperationProcessor::new()
    }

    pub fn anonymous(&self) -> RequestContext {
        RequestContext::anonymous(self.ctx.clone())
    }
}
