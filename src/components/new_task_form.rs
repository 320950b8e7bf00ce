//! New Task Form Component
//!
//! Appends a task to the end of a column.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;

#[component]
pub fn NewTaskForm(column_id: u32) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (new_title, set_new_title) = signal(String::new());

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get();
        if title.trim().is_empty() { return; }

        spawn_local(async move {
            if ctx.tasks_service().create(column_id, &title, "", None).await.is_ok() {
                set_new_title.set(String::new());
            }
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                type="text"
                placeholder="Add task..."
                prop:value=move || new_title.get()
                on:input=move |ev| set_new_title.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
