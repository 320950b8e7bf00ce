//! Toast Stack Component
//!
//! Transient notifications, newest at the bottom.

use leptos::prelude::*;

use kanban_dnd::ToastLevel;

use crate::context::AppContext;

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <div class="toast-stack">
            <For
                each=move || ctx.toasts.with(|n| n.toasts().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.level {
                        ToastLevel::Error => "toast error",
                        ToastLevel::Info => "toast info",
                    };
                    view! {
                        <div class=class role="status">
                            <span class="toast-message">{toast.message}</span>
                            <button
                                class="toast-dismiss"
                                on:click=move |_| ctx.notifier().dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
