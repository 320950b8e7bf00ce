//! Board Bar Component
//!
//! Board tabs: select, add, rename, delete, drag to reorder.

use leptos::prelude::*;
use leptos::task::spawn_local;

use kanban_dnd::entity::in_scope;
use kanban_dnd::model::BOARD_SCOPE;
use kanban_dnd::session::BoardDrag;
use kanban_dnd::{Board, DragContext, DragKind};

use crate::components::{placeholder_at, pulse_class, tail_zone, use_scope_preview, DeleteConfirmButton, DropZone};
use crate::context::AppContext;
use crate::dnd::{is_click, make_on_mousedown, DndSignals};

#[component]
pub fn BoardBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = use_context::<DndSignals>().expect("DndSignals should be provided");

    let ordered = move || in_scope(&ctx.boards.get(), BOARD_SCOPE);
    // Zone before each board; the trailing zone is rendered after the list
    let preview = use_scope_preview(dnd, DragKind::Board, BOARD_SCOPE, ordered);
    let tail = tail_zone(preview);

    view! {
        <nav class="board-bar">
            <For
                each=move || {
                    preview.with(|p| {
                        p.items.iter().cloned().enumerate().map(|(i, b)| (i, p.zone(i), b)).collect::<Vec<_>>()
                    })
                }
                key=|(index, zone, board)| (*index, *zone, board.id, board.name.clone())
                children=move |(index, zone, board)| {
                    view! {
                        <DropZone
                            dnd=dnd
                            kind=DragKind::Board
                            scope=BOARD_SCOPE
                            zone=zone
                            placeholder=placeholder_at(preview, index)
                            horizontal=true
                        />
                        <BoardTab board=board dnd=dnd />
                    }
                }
            />
            {move || {
                let (len, zone) = tail.get();
                view! {
                    <DropZone
                        dnd=dnd
                        kind=DragKind::Board
                        scope=BOARD_SCOPE
                        zone=zone
                        placeholder=placeholder_at(preview, len)
                        horizontal=true
                    />
                }
            }}
            <NewBoardForm />
        </nav>
    }
}

#[component]
fn BoardTab(board: Board, dnd: DndSignals) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let Some(id) = board.id else {
        return ().into_any();
    };
    let name = board.name.clone();
    let (editing, set_editing) = signal(false);
    let (draft_name, set_draft_name) = signal(name.clone());

    let on_mousedown = make_on_mousedown(dnd, DragContext::Board(BoardDrag { board_id: id }));

    let tab_class = move || {
        let mut c = String::from("board-tab");
        if ctx.current_board.get() == Some(id) { c.push_str(" selected"); }
        if dnd.session.with(|s| s.board().map(|b| b.board_id)) == Some(id) { c.push_str(" dragging"); }
        c.push_str(&pulse_class(ctx, id));
        c
    };

    let commit_rename = move || {
        set_editing.set(false);
        let new_name = draft_name.get_untracked();
        if new_name.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            let _ = ctx.boards_service().rename(id, &new_name).await;
        });
    };

    let on_delete = Callback::new(move |_| {
        spawn_local(async move {
            if ctx.boards_service().delete(id).await.is_ok() && ctx.current_board.get_untracked() == Some(id) {
                let next = ctx.boards.with_untracked(|b| b.first().and_then(|b| b.id));
                ctx.current_board.set(None);
                ctx.open_board(next).await;
            }
        });
    });

    view! {
        <div
            class=tab_class
            on:mousedown=on_mousedown
            on:click=move |_| {
                if is_click(&dnd) {
                    spawn_local(async move { ctx.open_board(Some(id)).await });
                }
            }
            on:dblclick=move |_| set_editing.set(true)
        >
            <Show
                when=move || editing.get()
                fallback=move || view! { <span class="board-name">{name.clone()}</span> }
            >
                <input
                    class="board-rename"
                    type="text"
                    prop:value=move || draft_name.get()
                    on:input=move |ev| set_draft_name.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => commit_rename(),
                        "Escape" => set_editing.set(false),
                        _ => {}
                    }
                    on:blur=move |_| {
                        if editing.get_untracked() {
                            commit_rename();
                        }
                    }
                />
            </Show>
            <DeleteConfirmButton button_class="board-delete-btn" on_confirm=on_delete />
        </div>
    }
    .into_any()
}

#[component]
fn NewBoardForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (new_name, set_new_name) = signal(String::new());

    let create_board = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get();
        if name.trim().is_empty() { return; }

        spawn_local(async move {
            if let Ok(created) = ctx.boards_service().create(&name).await {
                set_new_name.set(String::new());
                ctx.open_board(created.id).await;
            }
        });
    };

    view! {
        <form class="new-board-form" on:submit=create_board>
            <input
                type="text"
                placeholder="New board..."
                prop:value=move || new_name.get()
                on:input=move |ev| set_new_name.set(event_target_value(&ev))
            />
            <button type="submit">"+"</button>
        </form>
    }
}
