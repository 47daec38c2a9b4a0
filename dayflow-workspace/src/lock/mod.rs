//! Editing leases
//!
//! A workspace has at most one live lease, stored as `editing_by` (holder) and
//! `editing_at` (last refresh) on its row. A lease is live while
//! `now - editing_at < timeout`; expiry is computed on every read and nothing
//! sweeps stale leases. Every state change is a single conditional `UPDATE`,
//! so of two concurrent acquirers exactly one affects the row.

mod acquire;
mod heartbeat;
mod release;
mod transfer;

pub use acquire::AcquireLock;
pub use heartbeat::HeartbeatLock;
pub use release::ReleaseLock;
pub use transfer::TransferLock;

use crate::db::to_millis;
use crate::error::{LeaseDenial, Result, WorkspaceError};
use crate::store::{users, workspaces};
use crate::types::{LeaseView, LockStatus, UserId, UserSummary, Workspace, WorkspaceId};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

/// A lease interpreted at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseState {
    /// No holder recorded
    Free,
    /// `holder` may edit until `expires_at`
    Live {
        holder: UserId,
        refreshed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
    /// A holder is still recorded but the lease ran out
    Expired { holder: UserId },
}

impl LeaseState {
    /// Interpret the stored lease columns at `now`
    pub fn evaluate(
        editing_by: Option<&UserId>,
        editing_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Self {
        match (editing_by, editing_at) {
            (None, _) => LeaseState::Free,
            (Some(holder), Some(refreshed_at)) if now - refreshed_at < timeout => {
                LeaseState::Live {
                    holder: holder.clone(),
                    refreshed_at,
                    expires_at: refreshed_at + timeout,
                }
            }
            (Some(holder), _) => LeaseState::Expired {
                holder: holder.clone(),
            },
        }
    }

    /// The holder of a live lease
    pub fn live_holder(&self) -> Option<&UserId> {
        match self {
            LeaseState::Live { holder, .. } => Some(holder),
            _ => None,
        }
    }

    /// Whether `user` may edit right now
    pub fn is_held_by(&self, user: &UserId) -> bool {
        self.live_holder() == Some(user)
    }
}

/// Lease operations over one connection at one instant
pub struct LockManager<'c> {
    conn: &'c Connection,
    now: DateTime<Utc>,
    timeout: Duration,
}

impl<'c> LockManager<'c> {
    pub fn new(conn: &'c Connection, now: DateTime<Utc>, timeout: Duration) -> Self {
        Self { conn, now, timeout }
    }

    /// Refresh times at or before this instant are expired
    fn cutoff(&self) -> i64 {
        to_millis(self.now - self.timeout)
    }

    pub fn state(&self, workspace: &Workspace) -> LeaseState {
        LeaseState::evaluate(
            workspace.editing_by.as_ref(),
            workspace.editing_at,
            self.now,
            self.timeout,
        )
    }

    fn load(&self, workspace_id: &WorkspaceId) -> Result<Workspace> {
        workspaces::get(self.conn, workspace_id)?
            .ok_or_else(|| WorkspaceError::not_found("workspace", workspace_id))
    }

    /// Take or refresh the lease. Returns false when someone else holds a live one.
    pub fn acquire(&self, workspace_id: &WorkspaceId, user: &UserId) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE workspaces SET editing_by = ?1, editing_at = ?2 WHERE id = ?3 AND \
             (editing_by IS NULL OR editing_by = ?1 OR editing_at IS NULL OR editing_at <= ?4)",
            params![user, to_millis(self.now), workspace_id, self.cutoff()],
        )?;
        debug!(%workspace_id, %user, acquired = changed == 1, "acquire lease");
        Ok(changed == 1)
    }

    /// Clear the lease if `user` is the recorded holder. Returns whether anything changed.
    pub fn release(&self, workspace_id: &WorkspaceId, user: &UserId) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE workspaces SET editing_by = NULL, editing_at = NULL WHERE id = ?1 AND editing_by = ?2",
            params![workspace_id, user],
        )?;
        debug!(%workspace_id, %user, released = changed == 1, "release lease");
        Ok(changed == 1)
    }

    /// Refresh the lease timestamp if `user` is the recorded holder
    pub fn heartbeat(&self, workspace_id: &WorkspaceId, user: &UserId) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE workspaces SET editing_at = ?1 WHERE id = ?2 AND editing_by = ?3",
            params![to_millis(self.now), workspace_id, user],
        )?;
        Ok(changed == 1)
    }

    /// Hand a live lease from `from` to `to`, guarded on `from` still holding it
    pub fn transfer(&self, workspace_id: &WorkspaceId, from: &UserId, to: &UserId) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE workspaces SET editing_by = ?1, editing_at = ?2 \
             WHERE id = ?3 AND editing_by = ?4 AND editing_at > ?5",
            params![to, to_millis(self.now), workspace_id, from, self.cutoff()],
        )?;
        Ok(changed == 1)
    }

    /// Fail with `LockNotHeld` unless `user` holds a live lease
    pub fn assert_held(&self, workspace_id: &WorkspaceId, user: &UserId) -> Result<()> {
        let workspace = self.load(workspace_id)?;
        let reason = match self.state(&workspace) {
            LeaseState::Live { ref holder, .. } if holder == user => return Ok(()),
            LeaseState::Live { holder, .. } => LeaseDenial::HeldByOther { holder },
            LeaseState::Expired { holder } => LeaseDenial::Expired { holder },
            LeaseState::Free => LeaseDenial::NoLease,
        };
        Err(WorkspaceError::LockNotHeld {
            workspace_id: workspace_id.clone(),
            reason,
        })
    }

    /// The lease as `viewer` should see it; expired leases read as free
    pub fn view(&self, workspace: &Workspace, viewer: Option<&UserId>) -> Result<LeaseView> {
        match self.state(workspace) {
            LeaseState::Live {
                holder,
                refreshed_at,
                expires_at,
            } => {
                let editing_user = users::get(self.conn, &holder)?.map(|u| UserSummary::from(&u));
                Ok(LeaseView {
                    is_editing_by_me: viewer == Some(&holder),
                    editing_by: Some(holder),
                    editing_user,
                    editing_at: Some(refreshed_at),
                    expires_at: Some(expires_at),
                })
            }
            LeaseState::Free | LeaseState::Expired { .. } => Ok(LeaseView::default()),
        }
    }

    /// Current status of a workspace's lease for `viewer`
    pub fn status(&self, workspace_id: &WorkspaceId, viewer: &UserId) -> Result<LockStatus> {
        let workspace = self.load(workspace_id)?;
        Ok(LockStatus {
            workspace_id: workspace_id.clone(),
            lease: self.view(&workspace, Some(viewer))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_free_without_holder() {
        let state = LeaseState::evaluate(None, Some(at(0)), at(1), Duration::seconds(60));
        assert_eq!(state, LeaseState::Free);
    }

    #[test]
    fn test_live_until_timeout() {
        let holder = UserId::from("a");
        let state = LeaseState::evaluate(Some(&holder), Some(at(0)), at(59), Duration::seconds(60));
        assert!(state.is_held_by(&holder));
        assert!(!state.is_held_by(&UserId::from("b")));
    }

    #[test]
    fn test_expired_at_exact_timeout() {
        let holder = UserId::from("a");
        let state = LeaseState::evaluate(Some(&holder), Some(at(0)), at(60), Duration::seconds(60));
        assert_eq!(state, LeaseState::Expired { holder });
        assert_eq!(state.live_holder(), None);
    }

    #[test]
    fn test_holder_without_timestamp_is_expired() {
        let holder = UserId::from("a");
        let state = LeaseState::evaluate(Some(&holder), None, at(0), Duration::seconds(60));
        assert!(matches!(state, LeaseState::Expired { .. }));
    }
}
