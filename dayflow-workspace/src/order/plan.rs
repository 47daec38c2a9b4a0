//! Pure ordering rules
//!
//! A container is a sequence of member ids; a member's order is its index.
//! These functions compute the new sequence for each kind of change without
//! touching storage, so the same rules drive both the server and a client's
//! optimistic copy.

use std::collections::HashSet;
use std::hash::Hash;
use thiserror::Error;

/// Rejected explicit ordering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("{0} is not in this list")]
    UnknownMember(String),
    #[error("{0} is listed more than once")]
    DuplicateMember(String),
}

/// Clamp a requested index into `[0, max]`
pub fn clamp(target: i64, max: usize) -> usize {
    if target <= 0 {
        0
    } else {
        usize::try_from(target).map_or(max, |t| t.min(max))
    }
}

/// Order for a new member appended to a container of `len` members
pub fn append_position(len: usize) -> usize {
    len
}

/// Move `id` to `target` within `items`. Target is clamped to `[0, len - 1]`.
///
/// Returns `None` when `id` is not a member.
pub fn plan_reorder<T: Clone + PartialEq>(items: &[T], id: &T, target: i64) -> Option<Vec<T>> {
    let from = items.iter().position(|item| item == id)?;
    let mut planned = items.to_vec();
    let moved = planned.remove(from);
    let to = clamp(target, planned.len());
    planned.insert(to, moved);
    Some(planned)
}

/// Drop `id` from `items`; the rest close up. `None` when `id` is not a member.
pub fn plan_remove<T: Clone + PartialEq>(items: &[T], id: &T) -> Option<Vec<T>> {
    let from = items.iter().position(|item| item == id)?;
    let mut planned = items.to_vec();
    planned.remove(from);
    Some(planned)
}

/// Insert `id` at `target` (clamped to `[0, len]`)
pub fn plan_insert<T: Clone>(items: &[T], id: T, target: i64) -> Vec<T> {
    let mut planned = items.to_vec();
    let to = clamp(target, planned.len());
    planned.insert(to, id);
    planned
}

/// Listed ids first in the given order, then every unlisted member in its
/// current relative order
pub fn plan_explicit<T>(items: &[T], listed: &[T]) -> Result<Vec<T>, PlanError>
where
    T: Clone + Eq + Hash + std::fmt::Display,
{
    let members: HashSet<&T> = items.iter().collect();
    let mut seen: HashSet<&T> = HashSet::with_capacity(listed.len());
    for id in listed {
        if !members.contains(id) {
            return Err(PlanError::UnknownMember(id.to_string()));
        }
        if !seen.insert(id) {
            return Err(PlanError::DuplicateMember(id.to_string()));
        }
    }

    let mut planned: Vec<T> = listed.to_vec();
    planned.extend(items.iter().filter(|id| !seen.contains(id)).cloned());
    Ok(planned)
}

/// Members whose stored order differs from their index in `planned`
///
/// `current` pairs each id with its stored order; ids missing from it (a card
/// just moved in) are always reported.
pub fn changed_positions<T: Clone + PartialEq>(
    current: &[(T, usize)],
    planned: &[T],
) -> Vec<(T, usize)> {
    planned
        .iter()
        .enumerate()
        .filter(|(index, id)| {
            !current
                .iter()
                .any(|(member, order)| member == *id && order == index)
        })
        .map(|(index, id)| (id.clone(), index))
        .collect()
}

/// Whether orders are exactly `0..n` in sequence
pub fn is_dense(orders: &[usize]) -> bool {
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(index, order)| index == *order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorder_moves_and_clamps() {
        let items = ids(&["a", "b", "c"]);
        assert_eq!(
            plan_reorder(&items, &"a".to_string(), 2).unwrap(),
            ids(&["b", "c", "a"])
        );
        assert_eq!(
            plan_reorder(&items, &"a".to_string(), 99).unwrap(),
            ids(&["b", "c", "a"])
        );
        assert_eq!(
            plan_reorder(&items, &"c".to_string(), -4).unwrap(),
            ids(&["c", "a", "b"])
        );
        assert!(plan_reorder(&items, &"z".to_string(), 0).is_none());
    }

    #[test]
    fn test_same_position_changes_nothing() {
        let items = ids(&["a", "b", "c"]);
        let current: Vec<(String, usize)> =
            items.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect();
        let planned = plan_reorder(&items, &"b".to_string(), 1).unwrap();
        assert!(changed_positions(&current, &planned).is_empty());
    }

    #[test]
    fn test_insert_clamps_to_len() {
        let items = ids(&["a", "b"]);
        let x = || "x".to_string();
        assert_eq!(plan_insert(&items, x(), 10), ids(&["a", "b", "x"]));
        assert_eq!(plan_insert(&items, x(), 0), ids(&["x", "a", "b"]));
    }

    #[test]
    fn test_remove_closes_gap() {
        let items = ids(&["a", "b", "c"]);
        let planned = plan_remove(&items, &"a".to_string()).unwrap();
        assert_eq!(planned, ids(&["b", "c"]));

        let current = vec![("b".to_string(), 1), ("c".to_string(), 2)];
        assert_eq!(
            changed_positions(&current, &planned),
            vec![("b".to_string(), 0), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_explicit_appends_unlisted_members() {
        let items = ids(&["a", "b", "c", "d"]);
        assert_eq!(
            plan_explicit(&items, &ids(&["c", "a"])).unwrap(),
            ids(&["c", "a", "b", "d"])
        );
    }

    #[test]
    fn test_explicit_rejects_unknown_and_duplicate() {
        let items = ids(&["a", "b"]);
        assert_eq!(
            plan_explicit(&items, &ids(&["a", "z"])),
            Err(PlanError::UnknownMember("z".into()))
        );
        assert_eq!(
            plan_explicit(&items, &ids(&["a", "a"])),
            Err(PlanError::DuplicateMember("a".into()))
        );
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense(&[]));
        assert!(is_dense(&[2, 0, 1]));
        assert!(!is_dense(&[0, 2]));
        assert!(!is_dense(&[0, 0, 1]));
    }
}
