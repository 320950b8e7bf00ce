//! Edge Auto-Scroll Loop
//!
//! Runs the core `AutoScroller` against a real element, one tick per
//! animation frame, while a drag hovers near the element's edge.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use leptos::prelude::*;

use kanban_dnd::{AutoScrollConfig, AutoScroller, Axis, DragSession, ScrollContainer};

/// A DOM element scrolled along one axis
struct ElementScroll {
    el: web_sys::Element,
    axis: Axis,
}

impl ScrollContainer for ElementScroll {
    fn edges(&self) -> (f64, f64) {
        let rect = self.el.get_bounding_client_rect();
        match self.axis {
            Axis::Vertical => (rect.top(), rect.bottom()),
            Axis::Horizontal => (rect.left(), rect.right()),
        }
    }

    fn scroll_offset(&self) -> f64 {
        match self.axis {
            Axis::Vertical => f64::from(self.el.scroll_top()),
            Axis::Horizontal => f64::from(self.el.scroll_left()),
        }
    }

    fn max_scroll(&self) -> f64 {
        match self.axis {
            Axis::Vertical => f64::from(self.el.scroll_height() - self.el.client_height()),
            Axis::Horizontal => f64::from(self.el.scroll_width() - self.el.client_width()),
        }
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let offset = offset.round() as i32;
        match self.axis {
            Axis::Vertical => self.el.set_scroll_top(offset),
            Axis::Horizontal => self.el.set_scroll_left(offset),
        }
    }
}

struct LoopState {
    scroller: AutoScroller,
    el: Option<web_sys::Element>,
    frame: Option<AnimationFrame>,
}

/// Frame-driven scroller for one container
#[derive(Clone)]
pub struct EdgeScroll {
    axis: Axis,
    session: RwSignal<DragSession>,
    state: Rc<RefCell<LoopState>>,
}

impl EdgeScroll {
    pub fn new(axis: Axis, config: AutoScrollConfig, session: RwSignal<DragSession>) -> Self {
        Self {
            axis,
            session,
            state: Rc::new(RefCell::new(LoopState {
                scroller: AutoScroller::new(axis, config),
                el: None,
                frame: None,
            })),
        }
    }

    pub fn attach(&self, el: web_sys::Element) {
        self.state.borrow_mut().el = Some(el);
    }

    /// Feed the pointer; starts the frame loop when it enters an edge band
    pub fn pointer_moved(&self, x: f64, y: f64) {
        let pointer = match self.axis {
            Axis::Vertical => y,
            Axis::Horizontal => x,
        };
        let start = {
            let mut state = self.state.borrow_mut();
            let Some(el) = state.el.clone() else {
                return;
            };
            let container = ElementScroll { el, axis: self.axis };
            state.scroller.update(pointer, &container)
        };
        if start {
            self.schedule();
        }
    }

    /// Idempotent
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        state.scroller.stop();
        state.frame.take();
    }

    fn schedule(&self) {
        let this = self.clone();
        let handle = request_animation_frame(move |_| this.frame());
        self.state.borrow_mut().frame = Some(handle);
    }

    fn frame(&self) {
        let keep_going = {
            let mut state = self.state.borrow_mut();
            state.frame.take();
            let Some(el) = state.el.clone() else {
                return;
            };
            let drag_active = self.session.try_with_untracked(|s| s.is_active()).unwrap_or(false);
            let mut container = ElementScroll { el, axis: self.axis };
            state.scroller.tick(&mut container, drag_active)
        };
        if keep_going {
            self.schedule();
        }
    }
}
