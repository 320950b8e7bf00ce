//! Board View Component
//!
//! Columns laid out horizontally, with column drag-and-drop, the draft
//! "add column" flow and horizontal edge scrolling.

use leptos::prelude::*;
use leptos::task::spawn_local;

use kanban_dnd::entity::in_scope;
use kanban_dnd::{Axis, DragKind};

use crate::autoscroll::EdgeScroll;
use crate::components::{placeholder_at, tail_zone, use_scope_preview, ColumnView, DropZone};
use crate::context::AppContext;
use crate::dnd::DndSignals;

#[component]
pub fn BoardView(board_id: u32) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = use_context::<DndSignals>().expect("DndSignals should be provided");

    let scroll_ref = NodeRef::<leptos::html::Div>::new();
    let scroller = StoredValue::new_local(EdgeScroll::new(
        Axis::Horizontal,
        ctx.config().autoscroll,
        ctx.session,
    ));

    Effect::new(move |_| {
        if let Some(el) = scroll_ref.get() {
            scroller.with_value(|s| s.attach(el.into()));
        }
    });

    // Task and column drags both scroll the board sideways
    Effect::new(move |_| {
        let (x, y) = dnd.pointer.get();
        let active = dnd.session.with(|s| s.is_drag(DragKind::Task) || s.is_drag(DragKind::Column));
        scroller.with_value(|s| if active { s.pointer_moved(x, y) } else { s.stop() });
    });

    on_cleanup(move || {
        scroller.try_with_value(|s| s.stop());
    });

    let columns = move || in_scope(&ctx.columns.get(), board_id);
    let preview = use_scope_preview(dnd, DragKind::Column, board_id, columns);
    let tail = tail_zone(preview);
    let has_draft = move || ctx.columns.with(|cols| cols.iter().any(|c| c.is_draft()));

    let add_column = move |_: web_sys::MouseEvent| {
        spawn_local(async move {
            ctx.drafts().begin(board_id).await;
        });
    };

    view! {
        <div class="board-view" node_ref=scroll_ref>
            <For
                each=move || {
                    preview.with(|p| {
                        p.items.iter().cloned().enumerate().map(|(i, c)| (i, p.zone(i), c)).collect::<Vec<_>>()
                    })
                }
                key=|(index, zone, column)| (*index, *zone, column.id, column.name.clone(), column.committing)
                children=move |(index, zone, column)| {
                    view! {
                        <DropZone
                            dnd=dnd
                            kind=DragKind::Column
                            scope=board_id
                            zone=zone
                            placeholder=placeholder_at(preview, index)
                            horizontal=true
                        />
                        <ColumnView column=column />
                    }
                }
            />
            {move || {
                let (len, zone) = tail.get();
                view! {
                    <DropZone
                        dnd=dnd
                        kind=DragKind::Column
                        scope=board_id
                        zone=zone
                        placeholder=placeholder_at(preview, len)
                        horizontal=true
                    />
                }
            }}
            <Show when=move || !has_draft()>
                <button class="add-column-btn" on:click=add_column>"+ Add column"</button>
            </Show>
        </div>
    }
}
