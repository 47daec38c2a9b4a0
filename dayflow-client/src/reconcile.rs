//! Merge an authoritative snapshot into a locally edited copy
//!
//! [`patch_workspace`] writes only what differs: scalar fields are compared
//! one by one, lists are matched by id. Entries missing remotely are removed,
//! matching entries are patched in place, new ones are inserted at their
//! remote index, and finally a list whose members match but whose sequence
//! does not is re-sorted into the remote order. Every write is recorded in the
//! returned [`PatchReport`].

use dayflow_workspace::{Card, ColumnWithCards, Tool, UserSummary, WorkspaceSnapshot};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One write made while patching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Patch {
    /// A field of an entity was overwritten
    Field { entity: String, field: &'static str },
    /// An entry was dropped from a list
    Removed { list: String, id: String },
    /// An entry was added to a list
    Inserted { list: String, id: String },
    /// A list was re-sorted into the remote order
    Reordered { list: String },
}

/// Everything [`patch_workspace`] changed, in the order it changed it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub patches: Vec<Patch>,
}

impl PatchReport {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Fields written on `entity`
    pub fn fields_of(&self, entity: &str) -> Vec<&'static str> {
        self.patches
            .iter()
            .filter_map(|patch| match patch {
                Patch::Field { entity: e, field } if e == entity => Some(*field),
                _ => None,
            })
            .collect()
    }

    pub fn was_reordered(&self, list: &str) -> bool {
        self.patches
            .iter()
            .any(|patch| matches!(patch, Patch::Reordered { list: l } if l == list))
    }

    fn field(&mut self, entity: &str, field: &'static str) {
        self.patches.push(Patch::Field {
            entity: entity.to_string(),
            field,
        });
    }
}

/// Entries that can be matched across snapshots
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Card {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for ColumnWithCards {
    fn key(&self) -> &str {
        self.column.id.as_str()
    }
}

impl Keyed for Tool {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for UserSummary {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Copy each named field from `$remote` to `$local` when they differ
macro_rules! patch_fields {
    ($report:expr, $entity:expr, $local:expr, $remote:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if $local.$field != $remote.$field {
                $local.$field = $remote.$field.clone();
                $report.field($entity, stringify!($field));
            }
        )+
    };
}

/// Patch `local` in place so it equals `remote`
pub fn patch_workspace(local: &mut WorkspaceSnapshot, remote: &WorkspaceSnapshot) -> PatchReport {
    let mut report = PatchReport::default();
    let entity = format!("workspace:{}", remote.summary.id);

    {
        let (l, r) = (&mut local.summary, &remote.summary);
        patch_fields!(
            report,
            &entity,
            l,
            r,
            [id, owner_id, title, description, icon, is_owner, pinned, created_at, updated_at]
        );
    }
    {
        let (l, r) = (&mut local.summary.lease, &remote.summary.lease);
        patch_fields!(
            report,
            &entity,
            l,
            r,
            [editing_by, editing_user, editing_at, expires_at, is_editing_by_me]
        );
    }
    patch_fields!(report, &entity, local, remote, [owner, invite_token]);

    reconcile_list(
        &mut report,
        "members",
        &mut local.members,
        &remote.members,
        patch_member,
    );
    reconcile_list(
        &mut report,
        "columns",
        &mut local.columns,
        &remote.columns,
        patch_column,
    );
    reconcile_list(
        &mut report,
        "backlog",
        &mut local.backlog,
        &remote.backlog,
        patch_card,
    );
    reconcile_list(
        &mut report,
        "tools",
        &mut local.tools,
        &remote.tools,
        patch_tool,
    );

    report
}

fn patch_card(report: &mut PatchReport, local: &mut Card, remote: &Card) {
    let entity = format!("card:{}", remote.id);
    patch_fields!(
        report,
        &entity,
        local,
        remote,
        [
            title,
            done,
            tags,
            kind,
            payload,
            order,
            column_id,
            workspace_id,
            owner_id,
            created_at,
            updated_at,
        ]
    );
}

fn patch_column(report: &mut PatchReport, local: &mut ColumnWithCards, remote: &ColumnWithCards) {
    let entity = format!("column:{}", remote.column.id);
    {
        let (l, r) = (&mut local.column, &remote.column);
        patch_fields!(
            report,
            &entity,
            l,
            r,
            [title, order, hide_completed, color, workspace_id, created_at]
        );
    }
    reconcile_list(report, &entity, &mut local.cards, &remote.cards, patch_card);
}

fn patch_tool(report: &mut PatchReport, local: &mut Tool, remote: &Tool) {
    let entity = format!("tool:{}", remote.id);
    patch_fields!(
        report,
        &entity,
        local,
        remote,
        [title, link, description, icon, tags, owner_id, workspace_id, created_at]
    );
}

fn patch_member(report: &mut PatchReport, local: &mut UserSummary, remote: &UserSummary) {
    let entity = format!("user:{}", remote.id);
    patch_fields!(report, &entity, local, remote, [display_name, avatar_url]);
}

/// Remove, patch, insert, then realign one list
pub fn reconcile_list<T, F>(
    report: &mut PatchReport,
    list: &str,
    local: &mut Vec<T>,
    remote: &[T],
    mut patch: F,
) where
    T: Keyed + Clone,
    F: FnMut(&mut PatchReport, &mut T, &T),
{
    let remote_keys: HashSet<&str> = remote.iter().map(Keyed::key).collect();
    local.retain(|item| {
        let keep = remote_keys.contains(item.key());
        if !keep {
            report.patches.push(Patch::Removed {
                list: list.to_string(),
                id: item.key().to_string(),
            });
        }
        keep
    });

    let mut inserts = Vec::new();
    for (index, remote_item) in remote.iter().enumerate() {
        match local.iter_mut().find(|item| item.key() == remote_item.key()) {
            Some(local_item) => patch(report, local_item, remote_item),
            None => inserts.push(index),
        }
    }
    for index in inserts {
        let item = remote[index].clone();
        report.patches.push(Patch::Inserted {
            list: list.to_string(),
            id: item.key().to_string(),
        });
        let at = index.min(local.len());
        local.insert(at, item);
    }

    align_order(report, list, local, remote);
}

/// Sort `local` into the remote sequence when both hold the same ids
fn align_order<T: Keyed>(report: &mut PatchReport, list: &str, local: &mut [T], remote: &[T]) {
    if local.len() != remote.len() {
        return;
    }
    if local.iter().zip(remote).all(|(l, r)| l.key() == r.key()) {
        return;
    }
    let index: HashMap<&str, usize> = remote
        .iter()
        .enumerate()
        .map(|(i, item)| (item.key(), i))
        .collect();
    if local.iter().any(|item| !index.contains_key(item.key())) {
        return;
    }
    local.sort_by_key(|item| index.get(item.key()).copied().unwrap_or(usize::MAX));
    report.patches.push(Patch::Reordered {
        list: list.to_string(),
    });
}
