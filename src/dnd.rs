//! Mouse Drag-and-Drop Glue
//!
//! Simple drag-and-drop using mouse events. A press only becomes a drag
//! after the pointer travels past a threshold, so clicks keep working.
//! Which drag is active lives in the shared `DragSession`.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use kanban_dnd::entity::in_scope;
use kanban_dnd::model::BOARD_SCOPE;
use kanban_dnd::{DragContext, DragKind, DragSession, DragSource, DropOutcome, HoverZone, PulseCause, PulseSink};

use crate::context::AppContext;

/// Window after a drop during which clicks are ignored
const JUST_ENDED_MS: u32 = 100;

/// Mousedown seen, threshold not crossed yet
#[derive(Clone, Copy, Debug)]
struct PendingPress {
    context: DragContext,
    start_x: i32,
    start_y: i32,
    width: f64,
    height: f64,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub session: RwSignal<DragSession>,
    pending: RwSignal<Option<PendingPress>>,
    /// Last client (x, y) while dragging
    pub pointer: RwSignal<(f64, f64)>,
    pub just_ended: RwSignal<bool>,
    threshold_px: i32,
}

pub fn create_dnd_signals(session: RwSignal<DragSession>, threshold_px: i32) -> DndSignals {
    DndSignals {
        session,
        pending: RwSignal::new(None),
        pointer: RwSignal::new((0.0, 0.0)),
        just_ended: RwSignal::new(false),
        threshold_px,
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.session.update(|s| s.end_drag());
    dnd.pending.set(None);
    dnd.just_ended.set(true);

    let clear = dnd.just_ended;
    Timeout::new(JUST_ENDED_MS, move || {
        clear.try_set(false);
    })
    .forget();
}

/// True when a click is a real click and not the tail of a drag
pub fn is_click(dnd: &DndSignals) -> bool {
    !dnd.just_ended.get_untracked() && !dnd.session.with_untracked(|s| s.is_active())
}

fn is_form_control(ev: &web_sys::MouseEvent) -> bool {
    let Some(target) = ev.target() else {
        return false;
    };
    target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
}

/// Create mousedown handler for draggable items.
/// Records a pending drag with start position and the element's size.
pub fn make_on_mousedown(dnd: DndSignals, context: DragContext) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 || is_form_control(&ev) {
            return;
        }
        // Nested draggables (task inside column): innermost wins
        ev.stop_propagation();
        let (width, height) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                (rect.width(), rect.height())
            })
            .unwrap_or((0.0, 0.0));
        dnd.pending.set(Some(PendingPress {
            context,
            start_x: ev.client_x(),
            start_y: ev.client_y(),
            width,
            height,
        }));
    }
}

/// Document mousemove: starts a drag once moved enough, tracks the pointer
fn bind_global_mousemove(dnd: DndSignals) {
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let dragging = dnd.session.with_untracked(|s| s.is_active());
        if dragging {
            dnd.pointer.set((f64::from(ev.client_x()), f64::from(ev.client_y())));
            return;
        }
        let Some(press) = dnd.pending.get_untracked() else {
            return;
        };
        let dx = (ev.client_x() - press.start_x).abs();
        let dy = (ev.client_y() - press.start_y).abs();
        if dx > dnd.threshold_px || dy > dnd.threshold_px {
            log::debug!("[DND] start {:?}", press.context);
            dnd.session.update(|s| {
                s.start_drag(press.context);
                s.set_preview_size(press.width, press.height);
            });
            dnd.pending.set(None);
            dnd.pointer.set((f64::from(ev.client_x()), f64::from(ev.client_y())));
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for an insertion zone.
/// Only drags of the zone's own kind can target it.
pub fn make_on_zone_mouseenter(dnd: DndSignals, kind: DragKind, scope: u32, zone: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        let target = HoverZone { kind, scope, zone };
        let (dragging, hovered) = dnd.session.with_untracked(|s| (s.is_drag(kind), s.hovered_zone()));
        if dragging && hovered != Some(target) {
            dnd.session.update(|s| s.set_hovered_zone(Some(target)));
        }
    }
}

/// Create mouseleave handler for an insertion zone
pub fn make_on_zone_mouseleave(dnd: DndSignals, kind: DragKind, scope: u32, zone: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        let hovered = dnd.session.with_untracked(|s| s.hovered_zone());
        if hovered == Some(HoverZone { kind, scope, zone }) {
            dnd.session.update(|s| s.set_hovered_zone(None));
        }
    }
}

/// Column body hover, for task drops outside any zone
pub fn make_on_column_hover(dnd: DndSignals, column_id: Option<u32>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        let current = dnd.session.with_untracked(|s| s.hovered_column());
        if current != column_id {
            dnd.session.update(|s| s.set_hovered_column(column_id));
        }
    }
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(DragContext, Option<HoverZone>, Option<u32>) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let (active, zone, column) = dnd
            .session
            .with_untracked(|s| (s.active(), s.hovered_zone(), s.hovered_column()));

        // Clear pending state first
        dnd.pending.set(None);

        match active {
            // File drags finish through the native drop event
            Some(DragContext::File(_)) | None => {}
            Some(context) => {
                end_drag(&dnd);
                on_drop(context, zone, column);
            }
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}

// ========================
// Drop dispatch
// ========================

/// Commit a finished drag through the matching engine
pub fn handle_drop(ctx: AppContext, context: DragContext, zone: Option<HoverZone>, column: Option<u32>) {
    let Some((id, scope)) = context.source() else {
        return;
    };
    let source = DragSource { id, scope };
    let kind = context.kind();

    // A task released over a column body (no zone) goes to its end
    let zone = match (context, zone.filter(|z| z.kind == kind), column) {
        (_, Some(zone), _) => zone,
        (DragContext::Task(_), None, Some(column_id)) => {
            let len = ctx.tasks.with_untracked(|tasks| in_scope(tasks, column_id).len());
            HoverZone { kind, scope: column_id, zone: len }
        }
        _ => {
            log::debug!("[DND] released outside any zone");
            return;
        }
    };

    spawn_local(async move {
        let result = match context {
            DragContext::Task(_) => ctx.task_engine().drop_on(source, zone.scope, zone.zone).await,
            DragContext::Column(_) => {
                ctx.drafts().resolve().await;
                ctx.column_engine().drop_on(source, zone.scope, zone.zone).await
            }
            DragContext::Board(_) => ctx.board_engine().drop_on(source, BOARD_SCOPE, zone.zone).await,
            DragContext::File(_) => return,
        };
        match result {
            Ok(DropOutcome::Cancel) => log::debug!("[DND] drop on self edge, nothing to do"),
            Ok(outcome) => {
                log::debug!("[DND] dropped {} -> {:?}", id, outcome);
                ctx.pulse_sink().pulse(PulseCause::Dropped, id);
            }
            // Rolled back and reported by the engine
            Err(_) => {}
        }
    });
}
