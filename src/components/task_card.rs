//! Task Card Component
//!
//! A draggable task: completion toggle, inline editing, due date,
//! attachments, and file drop to upload.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use kanban_dnd::session::{FileDrag, TaskDrag};
use kanban_dnd::{DragContext, DragKind, KanbanApi, Notifier, Task};

use crate::api::upload_attachment;
use crate::components::{pulse_class, DeleteConfirmButton};
use crate::context::AppContext;
use crate::dnd::{is_click, make_on_mousedown, DndSignals};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

#[component]
pub fn TaskCard(task: Task) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = use_context::<DndSignals>().expect("DndSignals should be provided");

    let Some(id) = task.id else {
        return ().into_any();
    };
    let column_id = task.kanban_column_id;
    let completed = task.completed;

    let on_mousedown = make_on_mousedown(dnd, DragContext::Task(TaskDrag { task_id: id, source_column_id: column_id }));

    let card_class = move || {
        let mut c = String::from("task-card");
        if completed { c.push_str(" completed"); }
        if dnd.session.with(|s| s.task().map(|t| t.task_id)) == Some(id) { c.push_str(" dragging"); }
        if dnd.session.with(|s| s.file().and_then(|f| f.target_task_id)) == Some(id) { c.push_str(" file-over"); }
        c.push_str(&pulse_class(ctx, id));
        c
    };

    // ========================
    // Native file drop
    // ========================

    let on_dragover = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let over_this = dnd.session.with_untracked(|s| s.file().and_then(|f| f.target_task_id)) == Some(id);
        if !over_this {
            dnd.session.update(|s| s.start_drag(DragContext::File(FileDrag { target_task_id: Some(id) })));
        }
    };

    let on_dragleave = move |_ev: web_sys::DragEvent| {
        if dnd.session.with_untracked(|s| s.is_drag(DragKind::File)) {
            dnd.session.update(|s| s.end_drag());
        }
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        dnd.session.update(|s| s.end_drag());
        let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) else {
            return;
        };
        let files: Vec<web_sys::File> = (0..files.length()).filter_map(|i| files.get(i)).collect();
        if files.is_empty() {
            return;
        }
        spawn_local(async move {
            let api = ctx.api();
            let service = ctx.tasks_service();
            for file in files {
                match upload_attachment(&api, id, &file).await {
                    Ok(name) => service.attachment_added(id, &name),
                    Err(err) => ctx.notifier().error(&format!("Could not upload {}: {}", file.name(), err)),
                }
            }
        });
    };

    let on_toggle = move |_: web_sys::Event| {
        spawn_local(async move {
            let _ = ctx.tasks_service().toggle_completed(id).await;
        });
    };

    let on_delete = Callback::new(move |_| {
        spawn_local(async move {
            let _ = ctx.tasks_service().delete(id).await;
        });
    });

    let body = if task.is_editing {
        view! { <TaskEditor task=task.clone() /> }.into_any()
    } else {
        view! { <TaskSummary task=task.clone() /> }.into_any()
    };

    view! {
        <article
            class=card_class
            on:mousedown=on_mousedown
            on:dblclick=move |_| {
                if is_click(&dnd) {
                    ctx.tasks_service().set_editing(id, true);
                }
            }
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
        >
            <div class="task-row">
                <input type="checkbox" checked=completed on:change=on_toggle />
                {body}
                <DeleteConfirmButton button_class="task-delete-btn" on_confirm=on_delete />
            </div>
        </article>
    }
    .into_any()
}

/// Read-only card body
#[component]
fn TaskSummary(task: Task) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let id = task.id.unwrap_or_default();
    let api = ctx.api();

    let attachments = task
        .attachments
        .iter()
        .map(|name| {
            let url = api.attachment_url(id, name);
            let file_name = name.clone();
            let label = name.clone();
            view! {
                <li class="attachment">
                    <a href=url target="_blank" rel="noopener">{label}</a>
                    <button
                        class="attachment-delete-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            let file_name = file_name.clone();
                            spawn_local(async move {
                                let _ = ctx.tasks_service().remove_attachment(id, &file_name).await;
                            });
                        }
                    >
                        "×"
                    </button>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="task-body">
            <span class="task-title">{task.title.clone()}</span>
            {task.due_date.map(|due| view! {
                <span class="task-due">{due.format(DATE_FORMAT).to_string()}</span>
            })}
            {(!task.description.is_empty()).then(|| view! {
                <p class="task-description">{task.description.clone()}</p>
            })}
            {(!task.attachments.is_empty()).then(|| view! {
                <ul class="attachments">{attachments}</ul>
            })}
        </div>
    }
}

/// Inline editor shown while `is_editing` is set
#[component]
fn TaskEditor(task: Task) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let id = task.id.unwrap_or_default();

    let (title, set_title) = signal(task.title.clone());
    let (description, set_description) = signal(task.description.clone());
    let (due, set_due) = signal(
        task.due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
    );
    let original = StoredValue::new(task);

    let save = move || {
        let new_title = title.get_untracked();
        if new_title.trim().is_empty() {
            return;
        }
        let mut edited = original.get_value();
        edited.title = new_title.trim().to_string();
        edited.description = description.get_untracked();
        edited.due_date = parse_due_date(&due.get_untracked());
        spawn_local(async move {
            let _ = ctx.tasks_service().save(edited).await;
        });
    };

    view! {
        <form
            class="task-editor"
            on:submit=move |ev: web_sys::SubmitEvent| {
                ev.prevent_default();
                save();
            }
        >
            <input
                type="text"
                class="task-title-input"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                class="task-description-input"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <input
                type="date"
                prop:value=move || due.get()
                on:input=move |ev| set_due.set(event_target_value(&ev))
            />
            <div class="editor-actions">
                <button type="submit">"Save"</button>
                <button
                    type="button"
                    on:click=move |_| ctx.tasks_service().set_editing(id, false)
                >
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
