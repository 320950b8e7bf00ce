//! Optimistic Reorder/Move Engine
//!
//! Applies a new ordering to the shared list synchronously, persists it, and
//! rolls back on failure. One generic engine serves tasks, columns and boards;
//! the entity kind only shows up through `Positioned` and `ReorderBackend`.
//!
//! Each operation captures its own snapshot when it starts. Rollback is
//! compare-and-restore: the snapshot is put back wholesale only while the
//! list still holds exactly what this operation wrote. Otherwise only the
//! entries this operation touched, and that nobody changed since, are put
//! back, so a late failure cannot undo a later operation's success.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use async_trait::async_trait;

use crate::entity::{find_index, in_scope, normalize_scope, position_updates, reindex, sort_by_scope, Positioned};
use crate::error::ApiResult;
use crate::index::{apply_reorder, drop_outcome, DragSource, DropOutcome};
use crate::model::PositionUpdate;
use crate::notify::Notifier;

/// Read/replace access to a shared entity list
pub trait ListState<T> {
    fn snapshot(&self) -> Vec<T>;

    fn replace(&self, items: Vec<T>);
}

/// Plain shared list for non-reactive callers
#[derive(Debug, Default)]
pub struct SharedList<T>(Rc<RefCell<Vec<T>>>);

impl<T> Clone for SharedList<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Clone> SharedList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }
}

impl<T: Clone> ListState<T> for SharedList<T> {
    fn snapshot(&self) -> Vec<T> {
        self.0.borrow().clone()
    }

    fn replace(&self, items: Vec<T>) {
        *self.0.borrow_mut() = items;
    }
}

/// Persistence hooks for one entity kind
#[async_trait(?Send)]
pub trait ReorderBackend {
    type Item: Positioned;

    /// Bulk `{id, position}` update
    async fn reposition(&self, updates: &[PositionUpdate]) -> ApiResult<()>;

    /// Persist a scope change (task to another column, column to another board)
    async fn reassign(&self, item: &Self::Item) -> ApiResult<()>;
}

pub struct ReorderEngine<S, B, N> {
    state: S,
    backend: B,
    notifier: N,
}

impl<S, B, N> ReorderEngine<S, B, N>
where
    B: ReorderBackend,
    S: ListState<B::Item>,
    N: Notifier,
{
    pub fn new(state: S, backend: B, notifier: N) -> Self {
        Self { state, backend, notifier }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// One scope's items in display order
    pub fn scope_items(&self, scope: u32) -> Vec<B::Item> {
        in_scope(&self.state.snapshot(), scope)
    }

    /// Replace the whole list with freshly fetched items
    pub fn reload(&self, mut items: Vec<B::Item>) {
        sort_by_scope(&mut items);
        self.state.replace(items);
    }

    /// Merge an updated subset into the list and persist its positions
    pub async fn reorder(&self, updated: Vec<B::Item>) -> ApiResult<()> {
        if updated.is_empty() {
            return Ok(());
        }
        let before = self.state.snapshot();
        let mut after = before.clone();
        merge(&mut after, &updated);
        sort_by_scope(&mut after);
        self.state.replace(after.clone());

        let touched: Vec<u32> = updated.iter().filter_map(|i| i.key()).collect();
        let updates = position_updates(&updated);
        log::debug!("[DND] reorder {} items", updates.len());

        if let Err(err) = self.backend.reposition(&updates).await {
            log::error!("[DND] reorder failed, rolling back: {}", err);
            self.rollback(&before, &after, &touched);
            self.notifier.error(&format!("Could not save the new order: {}", err));
            return Err(err);
        }
        Ok(())
    }

    /// Move an item into `target_scope` at `target_index` (clamped)
    pub async fn move_to(&self, id: u32, target_scope: u32, target_index: usize) -> ApiResult<()> {
        let before = self.state.snapshot();
        let Some(item) = before.iter().find(|i| i.key() == Some(id)).cloned() else {
            log::warn!("[DND] move of unknown id {}", id);
            return Ok(());
        };
        let source_scope = item.scope();

        if source_scope == target_scope {
            let scoped = in_scope(&before, source_scope);
            let Some(from) = find_index(&scoped, id) else {
                return Ok(());
            };
            let to = target_index.min(scoped.len() - 1);
            if from == to {
                return Ok(());
            }
            return self.reorder(apply_reorder(&scoped, from, to)).await;
        }

        let mut source: Vec<B::Item> = in_scope(&before, source_scope)
            .into_iter()
            .filter(|i| i.key() != Some(id))
            .collect();
        reindex(&mut source);

        let mut dest = in_scope(&before, target_scope);
        let index = target_index.min(dest.len());
        let mut moved = item;
        moved.set_scope(target_scope);
        dest.insert(index, moved);
        reindex(&mut dest);

        let mut after: Vec<B::Item> = before
            .iter()
            .filter(|i| i.scope() != source_scope && i.scope() != target_scope)
            .cloned()
            .collect();
        after.extend(source.iter().cloned());
        after.extend(dest.iter().cloned());
        sort_by_scope(&mut after);
        self.state.replace(after.clone());

        let touched: Vec<u32> = source.iter().chain(dest.iter()).filter_map(|i| i.key()).collect();
        let mut updates = position_updates(&source);
        updates.extend(position_updates(&dest));
        log::debug!("[DND] move {} from scope {} to {}@{}", id, source_scope, target_scope, index);

        let result = match self.backend.reassign(&dest[index]).await {
            Ok(()) => self.backend.reposition(&updates).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            log::error!("[DND] move failed, rolling back: {}", err);
            self.rollback(&before, &after, &touched);
            self.notifier.error(&format!("Could not move the item: {}", err));
            return Err(err);
        }
        Ok(())
    }

    /// Resolve a drop on `zone` of `scope` and commit it.
    /// `Cancel` outcomes never reach the backend.
    pub async fn drop_on(&self, source: DragSource, scope: u32, zone: usize) -> ApiResult<DropOutcome> {
        let items = self.scope_items(scope);
        let outcome = drop_outcome(&items, scope, source, zone);
        match outcome {
            DropOutcome::Cancel => {}
            DropOutcome::Reorder { from, to } => self.reorder(apply_reorder(&items, from, to)).await?,
            DropOutcome::Insert { index } => self.move_to(source.id, scope, index).await?,
        }
        Ok(outcome)
    }

    fn rollback(&self, before: &[B::Item], after: &[B::Item], touched: &[u32]) {
        let current = self.state.snapshot();
        if current.as_slice() == after {
            self.state.replace(before.to_vec());
            return;
        }

        log::warn!("[DND] list changed since the failed operation began; partial rollback");
        let mut restored = current;
        let mut scopes = BTreeSet::new();
        for &id in touched {
            let (Some(written), Some(original)) = (
                after.iter().find(|i| i.key() == Some(id)),
                before.iter().find(|i| i.key() == Some(id)),
            ) else {
                continue;
            };
            let Some(idx) = find_index(&restored, id) else {
                continue;
            };
            // Changed again by a later operation: that one wins
            if restored[idx] != *written {
                continue;
            }
            scopes.insert(restored[idx].scope());
            scopes.insert(original.scope());
            restored[idx] = original.clone();
        }
        for scope in scopes {
            normalize_scope(&mut restored, scope);
        }
        self.state.replace(restored);
    }
}

/// Replace same-id entries, append unknown ones
fn merge<T: Positioned>(items: &mut Vec<T>, updated: &[T]) {
    for u in updated {
        let existing = match u.key() {
            Some(id) => find_index(items, id),
            None => items.iter().position(|i| i.key().is_none() && i.scope() == u.scope()),
        };
        match existing {
            Some(idx) => items[idx] = u.clone(),
            None => items.push(u.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    #[test]
    fn test_merge_replaces_by_id() {
        let mut tasks = vec![Task::new(1, 1, "a", 0), Task::new(2, 1, "b", 1)];
        let mut moved = Task::new(2, 1, "b", 0);
        moved.title = "b2".to_string();
        merge(&mut tasks, &[moved, Task::new(3, 2, "c", 0)]);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].title, "b2");
        assert_eq!(tasks[1].position, 0);
        assert_eq!(tasks[2].id, Some(3));
    }
}
