//! Ordering Contract
//!
//! Every orderable entity (board, column, task) lives in a scope and holds a
//! position inside it. The engine and index calculator only see this trait.

use crate::model::PositionUpdate;

/// Hooks the generic reorder engine needs from an entity kind
pub trait Positioned: Clone + PartialEq {
    /// Persisted id, None for drafts
    fn key(&self) -> Option<u32>;

    /// Ordering scope: column id for tasks, board id for columns
    fn scope(&self) -> u32;

    fn set_scope(&mut self, scope: u32);

    fn position(&self) -> i32;

    fn set_position(&mut self, position: i32);
}

/// Sort globally by (scope, position, id)
pub fn sort_by_scope<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| (item.scope(), item.position(), item.key()));
}

/// Items of one scope, sorted by position
pub fn in_scope<T: Positioned>(items: &[T], scope: u32) -> Vec<T> {
    let mut scoped: Vec<T> = items.iter().filter(|i| i.scope() == scope).cloned().collect();
    scoped.sort_by_key(|i| (i.position(), i.key()));
    scoped
}

/// Assign sequential positions (0, 1, 2, ...) in slice order
pub fn reindex<T: Positioned>(items: &mut [T]) {
    for (pos, item) in items.iter_mut().enumerate() {
        item.set_position(pos as i32);
    }
}

/// True when the scope's positions are exactly 0..n
pub fn is_dense<T: Positioned>(items: &[T], scope: u32) -> bool {
    let mut positions: Vec<i32> = items
        .iter()
        .filter(|i| i.scope() == scope)
        .map(|i| i.position())
        .collect();
    positions.sort_unstable();
    positions.iter().enumerate().all(|(idx, pos)| *pos == idx as i32)
}

pub fn find_index<T: Positioned>(items: &[T], id: u32) -> Option<usize> {
    items.iter().position(|i| i.key() == Some(id))
}

/// Bulk reorder payload for the given items; drafts are skipped
pub fn position_updates<T: Positioned>(items: &[T]) -> Vec<PositionUpdate> {
    items
        .iter()
        .filter_map(|i| i.key().map(|id| PositionUpdate { id, position: i.position() }))
        .collect()
}

/// Re-densify one scope in place, keeping its current relative order
pub fn normalize_scope<T: Positioned>(items: &mut Vec<T>, scope: u32) {
    let mut scoped = in_scope(items, scope);
    reindex(&mut scoped);
    items.retain(|i| i.scope() != scope);
    items.extend(scoped);
    sort_by_scope(items);
}
