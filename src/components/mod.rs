//! UI Components
//!
//! Leptos components for the board, its columns and tasks.

mod board_bar;
mod board_view;
mod column_view;
mod delete_confirm_button;
mod drop_zone;
mod new_task_form;
mod task_card;
mod toast_stack;

pub use board_bar::BoardBar;
pub use board_view::BoardView;
pub use column_view::ColumnView;
pub use delete_confirm_button::DeleteConfirmButton;
pub use drop_zone::DropZone;
pub use new_task_form::NewTaskForm;
pub use task_card::TaskCard;
pub use toast_stack::ToastStack;

use leptos::prelude::*;

use kanban_dnd::entity::Positioned;
use kanban_dnd::index::scope_preview;
use kanban_dnd::{DragKind, PulseCause, ScopePreview};

use crate::context::AppContext;
use crate::dnd::DndSignals;

/// CSS classes for any live pulses on `id`
pub(crate) fn pulse_class(ctx: AppContext, id: u32) -> String {
    ctx.pulses.with(|pulses| {
        let mut c = String::new();
        if pulses.is_pulsing(PulseCause::Dropped, id) { c.push_str(" pulse-dropped"); }
        if pulses.is_pulsing(PulseCause::Created, id) { c.push_str(" pulse-created"); }
        if pulses.is_pulsing(PulseCause::Saved, id) { c.push_str(" pulse-saved"); }
        c
    })
}

/// Display order, zone mapping and placeholder of one scope, following the
/// active drag of `kind`
pub(crate) fn use_scope_preview<T, F>(dnd: DndSignals, kind: DragKind, scope: u32, items: F) -> Memo<ScopePreview<T>>
where
    T: Positioned + Send + Sync + 'static,
    F: Fn() -> Vec<T> + Send + Sync + 'static,
{
    Memo::new(move |_| {
        let items = items();
        let (source, hovered) = dnd
            .session
            .with(|s| (s.source_of(kind), s.hovered_zone_in(kind, scope)));
        scope_preview(&items, scope, source, hovered)
    })
}

/// Placeholder flag for displayed zone `displayed`
pub(crate) fn placeholder_at<T>(preview: Memo<ScopePreview<T>>, displayed: usize) -> Signal<bool>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    Signal::derive(move || preview.with(|p| p.placeholder == Some(displayed)))
}

/// Count and real zone of the trailing slot
pub(crate) fn tail_zone<T>(preview: Memo<ScopePreview<T>>) -> Memo<(usize, usize)>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    Memo::new(move |_| preview.with(|p| (p.items.len(), p.zone(p.items.len()))))
}
