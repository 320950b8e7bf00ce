//! Per-Scope Index Calculator
//!
//! Pure functions over one scope's ordered list (a column's tasks, a board's
//! columns, the board list). A zone index `z` in `[0, len]` means "insert
//! before position z".

use crate::entity::{find_index, reindex, Positioned};

/// The dragged entity and the scope it was picked up from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSource {
    pub id: u32,
    pub scope: u32,
}

/// What a drop on a zone resolves to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Self-edge or stale source; nothing to persist
    Cancel,
    /// Same-scope move between indices of the list
    Reorder { from: usize, to: usize },
    /// Cross-scope insert at this index of the target list
    Insert { index: usize },
}

/// Insert index once the dragged item has been removed
fn insert_at(zone: usize, from: usize) -> usize {
    if zone > from {
        zone - 1
    } else {
        zone
    }
}

/// Zones directly before or after the dragged item do not change order
pub fn is_self_edge<T: Positioned>(items: &[T], scope: u32, source: DragSource, zone: usize) -> bool {
    if source.scope != scope {
        return false;
    }
    match find_index(items, source.id) {
        Some(from) => zone == from || zone == from + 1,
        None => false,
    }
}

/// Zone that should show a placeholder, if any
pub fn placeholder_zone<T: Positioned>(
    items: &[T],
    scope: u32,
    source: DragSource,
    zone: usize,
) -> Option<usize> {
    if is_self_edge(items, scope, source, zone) {
        None
    } else {
        Some(zone.min(items.len()))
    }
}

/// Move one item and re-densify positions
pub fn apply_reorder<T: Positioned>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut reordered = items.to_vec();
    if from >= reordered.len() {
        return reordered;
    }
    let moved = reordered.remove(from);
    let to = to.min(reordered.len());
    reordered.insert(to, moved);
    reindex(&mut reordered);
    reordered
}

/// Display order while a drag hovers `zone` of this scope.
///
/// Foreign drags leave the order alone (a placeholder is shown instead).
/// Same-scope drags preview the move; self-edge zones and unknown ids
/// return the input unchanged.
pub fn hover_order<T: Positioned>(
    items: &[T],
    scope: u32,
    source: DragSource,
    zone: Option<usize>,
) -> Vec<T> {
    let Some(zone) = zone else {
        return items.to_vec();
    };
    if source.scope != scope {
        return items.to_vec();
    }
    let Some(from) = find_index(items, source.id) else {
        return items.to_vec();
    };
    if is_self_edge(items, scope, source, zone) {
        return items.to_vec();
    }
    apply_reorder(items, from, insert_at(zone.min(items.len()), from))
}

/// Zone of the real list that zone `preview_zone` of a `hover_order`
/// preview stands for.
///
/// The two zones around the previewed item keep the hovered zone, so the
/// target stays put while the pointer rests on the moved item.
pub fn underlying_zone<T: Positioned>(
    items: &[T],
    scope: u32,
    source: DragSource,
    hovered: Option<usize>,
    preview_zone: usize,
) -> usize {
    let Some(hovered) = hovered else {
        return preview_zone;
    };
    if source.scope != scope || is_self_edge(items, scope, source, hovered) {
        return preview_zone;
    }
    let Some(from) = find_index(items, source.id) else {
        return preview_zone;
    };
    let at = insert_at(hovered.min(items.len()), from);
    if preview_zone == at || preview_zone == at + 1 {
        return hovered;
    }
    // Index into the list without the dragged item, then back to a zone
    let base = if preview_zone > at { preview_zone - 1 } else { preview_zone };
    if base >= from {
        base + 1
    } else {
        base
    }
}

/// One scope as rendered during a drag
#[derive(Clone, Debug, PartialEq)]
pub struct ScopePreview<T> {
    /// Display order: the hover-order preview for same-scope drags
    pub items: Vec<T>,
    /// Real zone behind each displayed zone; `items.len() + 1` entries
    pub zones: Vec<usize>,
    /// Displayed zone that grows into a placeholder (foreign drags only)
    pub placeholder: Option<usize>,
}

impl<T> ScopePreview<T> {
    pub fn zone(&self, displayed: usize) -> usize {
        self.zones.get(displayed).copied().unwrap_or(displayed)
    }
}

/// Display state for `scope` while `source` (if any) hovers `hovered`
pub fn scope_preview<T: Positioned>(
    items: &[T],
    scope: u32,
    source: Option<DragSource>,
    hovered: Option<usize>,
) -> ScopePreview<T> {
    let Some(source) = source else {
        return ScopePreview {
            items: items.to_vec(),
            zones: (0..=items.len()).collect(),
            placeholder: None,
        };
    };
    let zones = (0..=items.len())
        .map(|z| underlying_zone(items, scope, source, hovered, z))
        .collect();
    let placeholder = if source.scope == scope {
        None
    } else {
        hovered.and_then(|z| placeholder_zone(items, scope, source, z))
    };
    ScopePreview {
        items: hover_order(items, scope, source, hovered),
        zones,
        placeholder,
    }
}

/// Resolve a drop on `zone` of this scope
pub fn drop_outcome<T: Positioned>(
    items: &[T],
    scope: u32,
    source: DragSource,
    zone: usize,
) -> DropOutcome {
    let zone = zone.min(items.len());
    if source.scope != scope {
        return DropOutcome::Insert { index: zone };
    }
    let Some(from) = find_index(items, source.id) else {
        log::warn!("[DND] dragged id {} not in scope {}", source.id, scope);
        return DropOutcome::Cancel;
    };
    if is_self_edge(items, scope, source, zone) {
        return DropOutcome::Cancel;
    }
    DropOutcome::Reorder { from, to: insert_at(zone, from) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn column() -> Vec<Task> {
        vec![
            Task::new(1, 10, "A", 0),
            Task::new(2, 10, "B", 1),
            Task::new(3, 10, "C", 2),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<u32> {
        tasks.iter().map(|t| t.id.unwrap()).collect()
    }

    fn positions(tasks: &[Task]) -> Vec<i32> {
        tasks.iter().map(|t| t.position).collect()
    }

    const B: DragSource = DragSource { id: 2, scope: 10 };

    #[test]
    fn test_drag_b_to_top() {
        let order = hover_order(&column(), 10, B, Some(0));
        assert_eq!(ids(&order), vec![2, 1, 3]);
        assert_eq!(positions(&order), vec![0, 1, 2]);
        assert_eq!(drop_outcome(&column(), 10, B, 0), DropOutcome::Reorder { from: 1, to: 0 });
    }

    #[test]
    fn test_drag_b_to_end() {
        let order = hover_order(&column(), 10, B, Some(3));
        assert_eq!(ids(&order), vec![1, 3, 2]);
        assert_eq!(drop_outcome(&column(), 10, B, 3), DropOutcome::Reorder { from: 1, to: 2 });
    }

    #[test]
    fn test_self_edges_are_noops() {
        let tasks = column();
        for zone in [1, 2] {
            assert!(is_self_edge(&tasks, 10, B, zone));
            assert_eq!(placeholder_zone(&tasks, 10, B, zone), None);
            assert_eq!(hover_order(&tasks, 10, B, Some(zone)), tasks);
            assert_eq!(drop_outcome(&tasks, 10, B, zone), DropOutcome::Cancel);
        }
        assert_eq!(placeholder_zone(&tasks, 10, B, 0), Some(0));
    }

    #[test]
    fn test_hover_order_is_permutation() {
        let tasks = column();
        for source_id in 1..=3 {
            for zone in 0..=3 {
                let source = DragSource { id: source_id, scope: 10 };
                let order = hover_order(&tasks, 10, source, Some(zone));
                let mut sorted = ids(&order);
                sorted.sort_unstable();
                assert_eq!(sorted, vec![1, 2, 3]);
                let mut pos = positions(&order);
                pos.sort_unstable();
                assert_eq!(pos, vec![0, 1, 2]);
            }
        }
    }

    #[test]
    fn test_foreign_drag_keeps_order() {
        let tasks = column();
        let foreign = DragSource { id: 9, scope: 20 };
        assert_eq!(hover_order(&tasks, 10, foreign, Some(1)), tasks);
        assert!(!is_self_edge(&tasks, 10, foreign, 1));
        assert_eq!(drop_outcome(&tasks, 10, foreign, 1), DropOutcome::Insert { index: 1 });
        assert_eq!(drop_outcome(&tasks, 10, foreign, 99), DropOutcome::Insert { index: 3 });
    }

    #[test]
    fn test_preview_zones_map_back_to_real_zones() {
        let tasks = column();
        // B hovered over zone 0: displayed B A C
        let preview = scope_preview(&tasks, 10, Some(B), Some(0));
        assert_eq!(ids(&preview.items), vec![2, 1, 3]);
        assert_eq!(preview.zones, vec![0, 0, 2, 3]);
        assert_eq!(preview.placeholder, None);

        // Each displayed zone drops to the order it shows
        for displayed in 0..=3 {
            let zone = preview.zone(displayed);
            let shown = hover_order(&tasks, 10, B, Some(zone));
            match drop_outcome(&tasks, 10, B, zone) {
                DropOutcome::Reorder { from, to } => assert_eq!(apply_reorder(&tasks, from, to), shown),
                DropOutcome::Cancel => assert_eq!(shown, tasks),
                DropOutcome::Insert { .. } => panic!("same-scope drop resolved to insert"),
            }
        }
    }

    #[test]
    fn test_preview_is_stable_under_the_moved_item() {
        let tasks = column();
        let a = DragSource { id: 1, scope: 10 };
        // A hovered at the end: displayed B C A
        let preview = scope_preview(&tasks, 10, Some(a), Some(3));
        assert_eq!(ids(&preview.items), vec![2, 3, 1]);
        // Zones around A keep zone 3, so re-entering them changes nothing
        assert_eq!(preview.zone(2), 3);
        assert_eq!(preview.zone(3), 3);
        assert_eq!(preview.zone(0), 1);
        assert_eq!(preview.zone(1), 2);
    }

    #[test]
    fn test_foreign_preview_keeps_order_and_shows_placeholder() {
        let tasks = column();
        let foreign = DragSource { id: 9, scope: 20 };
        let preview = scope_preview(&tasks, 10, Some(foreign), Some(1));
        assert_eq!(preview.items, tasks);
        assert_eq!(preview.zones, vec![0, 1, 2, 3]);
        assert_eq!(preview.placeholder, Some(1));

        let idle = scope_preview(&tasks, 10, None, None);
        assert_eq!(idle.items, tasks);
        assert_eq!(idle.placeholder, None);
    }

    #[test]
    fn test_unknown_source_is_noop() {
        let tasks = column();
        let stale = DragSource { id: 42, scope: 10 };
        assert_eq!(hover_order(&tasks, 10, stale, Some(0)), tasks);
        assert_eq!(drop_outcome(&tasks, 10, stale, 0), DropOutcome::Cancel);
    }
}
