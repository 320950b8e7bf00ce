//! Kanban Frontend App
//!
//! Boards bar on top, the open board below, toasts in a corner.

use leptos::prelude::*;
use leptos::task::spawn_local;

use kanban_dnd::{Config, ReloadKind};

use crate::components::{BoardBar, BoardView, ToastStack};
use crate::context::AppContext;
use crate::dnd::{bind_global_mouseup, create_dnd_signals, handle_drop};
use crate::sync::bind_event_stream;

#[component]
pub fn App(config: Config) -> impl IntoView {
    let threshold = config.drag_threshold_px;
    let ctx = AppContext::new(config);
    let dnd = create_dnd_signals(ctx.session, threshold);

    // Provide context to all children
    provide_context(ctx);
    provide_context(dnd);

    bind_global_mouseup(dnd, move |context, zone, column| handle_drop(ctx, context, zone, column));
    bind_event_stream(ctx);
    on_cleanup(move || ctx.cancel_timers());

    // Load boards on mount and open the first one
    spawn_local(async move {
        ctx.reload(ReloadKind::Boards).await;
        let first = ctx.boards.with_untracked(|boards| boards.first().and_then(|b| b.id));
        ctx.open_board(first).await;
    });

    view! {
        <div class="app-layout">
            <BoardBar />

            <main class="board-area">
                {move || match ctx.current_board.get() {
                    Some(board_id) => view! { <BoardView board_id=board_id /> }.into_any(),
                    None => view! { <p class="empty-hint">"Create a board to get started"</p> }.into_any(),
                }}
            </main>

            <ToastStack />
        </div>
    }
}
