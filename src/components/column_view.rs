//! Column View Component
//!
//! One column: header (drag handle, rename, delete), its tasks with drop
//! zones between them (previewing a same-column move while it hovers),
//! vertical edge scrolling and the new-task form.
//! A draft column renders a name input instead.

use leptos::prelude::*;
use leptos::task::spawn_local;

use kanban_dnd::entity::in_scope;
use kanban_dnd::session::ColumnDrag;
use kanban_dnd::{Axis, Column, DragContext, DragKind, ReloadKind};

use crate::autoscroll::EdgeScroll;
use crate::components::{
    placeholder_at, pulse_class, tail_zone, use_scope_preview, DeleteConfirmButton, DropZone, NewTaskForm, TaskCard,
};
use crate::context::AppContext;
use crate::dnd::{make_on_column_hover, make_on_mousedown, DndSignals};

#[component]
pub fn ColumnView(column: Column) -> impl IntoView {
    match column.id {
        Some(id) => view! { <PersistedColumn column_id=id board_id=column.board_id name=column.name /> }.into_any(),
        None if column.committing => view! {
            <section class="column draft committing">
                <h2 class="column-name">{column.name}</h2>
            </section>
        }
        .into_any(),
        None => view! { <DraftColumn /> }.into_any(),
    }
}

#[component]
fn DraftColumn() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (name, set_name) = signal(String::new());
    let input_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    let commit = move || {
        let drafts = ctx.drafts();
        drafts.rename(&name.get_untracked());
        spawn_local(async move {
            drafts.commit().await;
        });
    };

    view! {
        <section class="column draft">
            <input
                class="column-name-input"
                type="text"
                placeholder="Column name..."
                node_ref=input_ref
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
                on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                    "Enter" => commit(),
                    "Escape" => ctx.drafts().discard(),
                    _ => {}
                }
                on:blur=move |_| commit()
            />
        </section>
    }
}

#[component]
fn PersistedColumn(column_id: u32, board_id: u32, name: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = use_context::<DndSignals>().expect("DndSignals should be provided");

    let (editing, set_editing) = signal(false);
    let (draft_name, set_draft_name) = signal(name);

    // Vertical scrolling only for the column under a task drag
    let body_ref = NodeRef::<leptos::html::Div>::new();
    let scroller = StoredValue::new_local(EdgeScroll::new(Axis::Vertical, ctx.config().autoscroll, ctx.session));
    Effect::new(move |_| {
        if let Some(el) = body_ref.get() {
            scroller.with_value(|s| s.attach(el.into()));
        }
    });
    Effect::new(move |_| {
        let (x, y) = dnd.pointer.get();
        let here = dnd
            .session
            .with(|s| s.is_drag(DragKind::Task) && s.hovered_column() == Some(column_id));
        scroller.with_value(|s| if here { s.pointer_moved(x, y) } else { s.stop() });
    });
    on_cleanup(move || {
        scroller.try_with_value(|s| s.stop());
    });

    let tasks = move || in_scope(&ctx.tasks.get(), column_id);
    let preview = use_scope_preview(dnd, DragKind::Task, column_id, tasks);
    let tail = tail_zone(preview);

    let on_header_mousedown = make_on_mousedown(dnd, DragContext::Column(ColumnDrag { column_id, board_id }));
    let on_hover = make_on_column_hover(dnd, Some(column_id));
    let on_leave = make_on_column_hover(dnd, None);

    let commit_rename = move || {
        set_editing.set(false);
        let new_name = draft_name.get_untracked();
        if new_name.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            ctx.drafts().resolve().await;
            let _ = ctx.columns_service().rename(column_id, &new_name).await;
        });
    };

    let on_delete = Callback::new(move |_| {
        spawn_local(async move {
            ctx.drafts().resolve().await;
            if ctx.columns_service().delete(column_id).await.is_ok() {
                // Its tasks went with it server-side
                ctx.reload(ReloadKind::Tasks).await;
            }
        });
    });

    let column_class = move || {
        let mut c = String::from("column");
        if dnd.session.with(|s| s.column().map(|d| d.column_id)) == Some(column_id) { c.push_str(" dragging"); }
        if dnd.session.with(|s| s.hovered_column()) == Some(column_id) { c.push_str(" task-hover"); }
        c.push_str(&pulse_class(ctx, column_id));
        c
    };

    view! {
        <section class=column_class on:mousemove=on_hover on:mouseleave=on_leave>
            <header class="column-header" on:mousedown=on_header_mousedown on:dblclick=move |_| set_editing.set(true)>
                <Show
                    when=move || editing.get()
                    fallback=move || view! { <h2 class="column-name">{move || draft_name.get()}</h2> }
                >
                    <input
                        class="column-name-input"
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
                <span class="task-count">{move || tasks().len()}</span>
                <DeleteConfirmButton button_class="column-delete-btn" on_confirm=on_delete />
            </header>

            <div class="column-body" node_ref=body_ref>
                <For
                    each=move || {
                        preview.with(|p| {
                            p.items.iter().cloned().enumerate().map(|(i, t)| (i, p.zone(i), t)).collect::<Vec<_>>()
                        })
                    }
                    key=|(index, zone, task)| {
                        (
                            *index,
                            *zone,
                            task.id,
                            task.title.clone(),
                            task.description.clone(),
                            task.completed,
                            task.due_date,
                            task.attachments.clone(),
                            task.is_editing,
                        )
                    }
                    children=move |(index, zone, task)| {
                        view! {
                            <DropZone
                                dnd=dnd
                                kind=DragKind::Task
                                scope=column_id
                                zone=zone
                                placeholder=placeholder_at(preview, index)
                            />
                            <TaskCard task=task />
                        }
                    }
                />
                {move || {
                    let (len, zone) = tail.get();
                    view! {
                        <DropZone
                            dnd=dnd
                            kind=DragKind::Task
                            scope=column_id
                            zone=zone
                            placeholder=placeholder_at(preview, len)
                        />
                    }
                }}
            </div>

            <NewTaskForm column_id=column_id />
        </section>
    }
}
