//! Realtime Sync
//!
//! Listens to the server's change events and re-fetches affected lists.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use kanban_dnd::ReloadRequest;

use crate::context::AppContext;

/// Open the event stream. The browser reconnects on its own; the source
/// lives for the whole page.
pub fn bind_event_stream(ctx: AppContext) {
    let url = ctx.config().url(&ctx.config().events_path);
    let source = match web_sys::EventSource::new(&url) {
        Ok(source) => source,
        Err(err) => {
            rolling_logger::error(&format!("[SYNC] could not open {}: {:?}", url, err));
            return;
        }
    };

    let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |ev: web_sys::MessageEvent| {
        let Some(payload) = ev.data().as_string() else {
            return;
        };
        let Some(request) = ReloadRequest::parse(&payload) else {
            return;
        };
        if !request.applies_to(ctx.current_board.get_untracked()) {
            log::debug!("[SYNC] ignoring {:?} for another board", request);
            return;
        }
        spawn_local(async move {
            ctx.reload(request.kind).await;
        });
    });
    source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
        log::warn!("[SYNC] event stream error, browser will retry");
    });
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    rolling_logger::info(&format!("[SYNC] listening on {}", url));
}
