//! Drop Zone Component
//!
//! An insertion slot between items. Hidden unless a drag of its kind is
//! active; grows into a placeholder when a drag from another scope targets
//! it. Same-scope drags show the moved item in place instead.

use leptos::prelude::*;

use kanban_dnd::DragKind;

use crate::dnd::{make_on_zone_mouseenter, make_on_zone_mouseleave, DndSignals};

#[component]
pub fn DropZone(
    dnd: DndSignals,
    /// Which drags this zone accepts
    kind: DragKind,
    scope: u32,
    /// Insert before position `zone` of the real list
    zone: usize,
    /// Render as the placeholder for the dragged element
    #[prop(into)]
    placeholder: Signal<bool>,
    /// Lay out horizontally (columns, boards)
    #[prop(optional)]
    horizontal: bool,
) -> impl IntoView {
    let on_mouseenter = make_on_zone_mouseenter(dnd, kind, scope, zone);
    let on_mouseleave = make_on_zone_mouseleave(dnd, kind, scope, zone);

    let is_dragging = move || dnd.session.with(|s| s.is_drag(kind));
    let is_active = move || is_dragging() && placeholder.get();

    let zone_class = move || {
        let mut c = String::from(if horizontal { "drop-zone horizontal" } else { "drop-zone" });
        if !is_dragging() { c.push_str(" hidden"); }
        if is_active() { c.push_str(" active placeholder"); }
        c
    };

    // Placeholder takes the dragged element's size
    let zone_style = move || {
        if !is_active() {
            return String::new();
        }
        match dnd.session.with(|s| s.preview_size()) {
            Some((w, _)) if horizontal => format!("width: {}px;", w.round()),
            Some((_, h)) => format!("height: {}px;", h.round()),
            None => String::new(),
        }
    };

    view! {
        <div
            class=zone_class
            style=zone_style
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        />
    }
}
