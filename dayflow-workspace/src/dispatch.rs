//! Mutation dispatcher
//!
//! Every mutation names the entity it touches through [`Mutation::target`].
//! [`LockMiddleware`] resolves that target to the owning workspace and, unless
//! the operation is exempt, requires the caller to have access and to hold a
//! live editing lease before the wrapped command runs. The command then runs
//! with a lease-scoped [`RequestContext`], whose writes assert the same lease
//! again inside their own transaction.

use crate::access;
use crate::context::RequestContext;
use crate::error::{Result, WorkspaceError};
use crate::store::{cards, columns, roadmaps, tools, workspaces};
use crate::types::{CardId, ColumnId, RoadmapId, RoadmapNodeId, ToolId, WorkspaceId};
use dayflow_operations::{async_trait, Execute, ExecutionResult, Operation, Value};
use rusqlite::Connection;
use tracing::debug;

/// Entity a mutation acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationTarget {
    Workspace(WorkspaceId),
    Column(ColumnId),
    Card(CardId),
    Tool(ToolId),
    Roadmap(RoadmapId),
    RoadmapNode(RoadmapNodeId),
    /// Not tied to any workspace (user profile, hub entities being created)
    Global,
}

impl MutationTarget {
    /// Owning workspace, or `None` for user-global entities and missing rows
    pub fn resolve(&self, conn: &Connection) -> Result<Option<WorkspaceId>> {
        Ok(match self {
            MutationTarget::Workspace(id) => workspaces::get(conn, id)?.map(|w| w.id),
            MutationTarget::Column(id) => columns::get(conn, id)?.map(|c| c.workspace_id),
            MutationTarget::Card(id) => cards::get(conn, id)?.and_then(|c| c.workspace_id),
            MutationTarget::Tool(id) => tools::get(conn, id)?.and_then(|t| t.workspace_id),
            MutationTarget::Roadmap(id) => roadmaps::get(conn, id)?.map(|r| r.workspace_id),
            MutationTarget::RoadmapNode(id) => match roadmaps::get_node(conn, id)? {
                Some(node) => roadmaps::get(conn, &node.roadmap_id)?.map(|r| r.workspace_id),
                None => None,
            },
            MutationTarget::Global => None,
        })
    }
}

/// A state-changing command
pub trait Mutation: Execute<RequestContext, WorkspaceError> + Operation + Send + Sync {
    fn target(&self) -> MutationTarget;
}

/// Decides from an op string ("move card") whether the lease check is skipped
pub type ExemptionPredicate = fn(&str) -> bool;

/// Operations that never need a lease: account, workspace lifecycle, sharing
/// and the lock commands themselves
pub const LOCK_EXEMPT_OPERATIONS: &[&str] = &[
    "register user",
    "update profile",
    "create workspace",
    "delete workspace",
    "toggle pin",
    "generate invite",
    "accept invite",
    "remove member",
    "acquire lock",
    "release lock",
    "heartbeat lock",
    "transfer lock",
];

/// Default exemption predicate
pub fn is_lock_exempt(op: &str) -> bool {
    LOCK_EXEMPT_OPERATIONS.contains(&op)
}

/// Wraps mutations with the access and lease checks
#[derive(Debug, Clone, Copy)]
pub struct LockMiddleware {
    is_exempt: ExemptionPredicate,
}

impl LockMiddleware {
    pub fn new(is_exempt: ExemptionPredicate) -> Self {
        Self { is_exempt }
    }

    /// Wrap a mutation so that executing it runs the checks first
    pub fn wrap<'a, M: Mutation>(&self, mutation: &'a M) -> Guarded<'a, M> {
        Guarded {
            middleware: *self,
            inner: mutation,
        }
    }

    pub fn is_exempt(&self, op: &str) -> bool {
        (self.is_exempt)(op)
    }

    /// Run the checks and build the context `mutation` should execute with
    ///
    /// For a non-exempt mutation scoped to a workspace the context is bound to
    /// the caller's lease on it.
    pub fn admit<M: Mutation + ?Sized>(
        &self,
        mutation: &M,
        ctx: &RequestContext,
    ) -> Result<Admission> {
        let scope = self.check(mutation, ctx)?;
        let ctx = match &scope {
            Some(workspace_id) if !self.is_exempt(&mutation.op_string()) => {
                ctx.within_lease(workspace_id.clone())
            }
            _ => ctx.clone(),
        };
        Ok(Admission { scope, ctx })
    }

    /// Run the checks for `mutation`; returns the workspace it resolved to
    pub fn check<M: Mutation + ?Sized>(
        &self,
        mutation: &M,
        ctx: &RequestContext,
    ) -> Result<Option<WorkspaceId>> {
        let op = mutation.op_string();
        let target = mutation.target();
        let resolved = ctx.db().read(|conn| target.resolve(conn))?;

        if self.is_exempt(&op) {
            return Ok(resolved);
        }

        let user = ctx.require_user()?;
        let Some(workspace_id) = resolved else {
            debug!(%op, ?target, "no workspace scope, skipping lease check");
            return Ok(None);
        };

        ctx.db().read(|conn| {
            access::require_access(conn, &workspace_id, user)?;
            ctx.locks(conn).assert_held(&workspace_id, user)
        })?;
        Ok(Some(workspace_id))
    }
}

impl Default for LockMiddleware {
    fn default() -> Self {
        Self::new(is_lock_exempt)
    }
}

/// A mutation that passed the middleware checks
#[derive(Debug, Clone)]
pub struct Admission {
    /// Workspace the mutation resolved to
    pub scope: Option<WorkspaceId>,
    /// Context to execute the mutation with
    pub ctx: RequestContext,
}

/// A mutation behind the lock middleware
pub struct Guarded<'a, M> {
    middleware: LockMiddleware,
    inner: &'a M,
}

impl<'a, M: Mutation> Operation for Guarded<'a, M> {
    fn verb(&self) -> &'static str {
        self.inner.verb()
    }

    fn noun(&self) -> &'static str {
        self.inner.noun()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }
}

#[async_trait]
impl<'a, M: Mutation> Execute<RequestContext, WorkspaceError> for Guarded<'a, M> {
    async fn execute(&self, ctx: &RequestContext) -> ExecutionResult<Value, WorkspaceError> {
        let Admission { scope, ctx } = match self.middleware.admit(self.inner, ctx) {
            Ok(admission) => admission,
            Err(error) => {
                debug!(op = %self.inner.op_string(), %error, "mutation rejected");
                return ExecutionResult::Failed {
                    error,
                    log_entry: None,
                };
            }
        };

        match self.inner.execute(&ctx).await {
            ExecutionResult::Logged { value, log_entry } => ExecutionResult::Logged {
                value,
                log_entry: match scope {
                    Some(workspace_id) => log_entry.with_scope(workspace_id.as_str()),
                    None => log_entry,
                },
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AddCard;
    use crate::error::LeaseDenial;
    use crate::test_support::setup;
    use crate::workspace::TogglePin;
    use chrono::Duration;

    #[test]
    fn test_exempt_operations() {
        for op in [
            "create workspace",
            "delete workspace",
            "acquire lock",
            "release lock",
            "heartbeat lock",
            "transfer lock",
            "accept invite",
        ] {
            assert!(is_lock_exempt(op), "{op} should be exempt");
        }
        for op in ["move card", "add column", "update workspace", "reorder columns"] {
            assert!(!is_lock_exempt(op), "{op} should need the lease");
        }
    }

    #[tokio::test]
    async fn test_admitted_write_fails_once_the_lease_changes_hands() {
        let bed = setup().await;
        bed.join_as_bob().await;
        bed.lock_for(&bed.alice_id);
        let add = AddCard::new("late").in_column(bed.column.clone());
        let middleware = LockMiddleware::default();

        // The checks pass a second before alice's lease runs out
        bed.clock.advance(Duration::seconds(59));
        let admission = middleware.admit(&add, &bed.alice).unwrap();
        assert_eq!(admission.scope.as_ref(), Some(&bed.workspace));
        assert_eq!(admission.ctx.lease_scope(), Some(&bed.workspace));

        // Bob takes over before the command gets to write
        bed.clock.advance(Duration::seconds(2));
        bed.lock_for(&bed.bob_id);

        let result = add.execute(&admission.ctx).await.into_result();
        match result {
            Err(WorkspaceError::LockNotHeld {
                reason: LeaseDenial::HeldByOther { holder },
                ..
            }) => assert_eq!(holder, bed.bob_id),
            other => panic!("expected a lock error, got {other:?}"),
        }
        let cards = bed
            .ctx
            .db()
            .read(|conn| cards::list_in_column(conn, &bed.column))
            .unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_exempt_mutations_are_not_bound_to_a_lease() {
        let bed = setup().await;
        let admission = LockMiddleware::default()
            .admit(&TogglePin::new(bed.workspace.clone()), &bed.alice)
            .unwrap();
        assert_eq!(admission.scope.as_ref(), Some(&bed.workspace));
        assert!(admission.ctx.lease_scope().is_none());
    }
}
