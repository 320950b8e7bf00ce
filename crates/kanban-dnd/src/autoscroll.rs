//! Edge Auto-Scroll
//!
//! While a drag hovers near a scroll container's edge, scroll it every frame
//! at a speed that grows as the pointer approaches (or passes) the edge.
//! The frame loop itself belongs to the caller: `update` says when to start
//! one, `tick` runs one frame and says whether to keep going.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Top/bottom edges, one per column
    Vertical,
    /// Left/right edges, one per board
    Horizontal,
}

/// Scrollable element seen along one axis
pub trait ScrollContainer {
    /// Client-space (start, end) edges: (top, bottom) or (left, right)
    fn edges(&self) -> (f64, f64);

    fn scroll_offset(&self) -> f64;

    /// Largest reachable offset (scroll size minus client size)
    fn max_scroll(&self) -> f64;

    fn set_scroll_offset(&mut self, offset: f64);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoScrollConfig {
    /// Distance from an edge (px) where scrolling kicks in
    pub threshold: f64,
    /// px per frame at the threshold
    pub min_speed: f64,
    /// px per frame at (or past) the edge
    pub max_speed: f64,
    /// Ease-in exponent applied to the proximity ratio
    pub exponent: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            min_speed: 2.0,
            max_speed: 22.0,
            exponent: 0.75,
        }
    }
}

/// px per frame for a pointer `distance` px inside an edge (negative = past it)
pub fn edge_speed(distance: f64, config: &AutoScrollConfig) -> f64 {
    if config.threshold <= 0.0 || distance >= config.threshold {
        return 0.0;
    }
    let ratio = ((config.threshold - distance) / config.threshold).clamp(0.0, 1.0);
    config.min_speed + (config.max_speed - config.min_speed) * ratio.powf(config.exponent)
}

/// Direction (-1, 0, 1) and speed for the pointer, honoring scroll bounds
fn velocity<C: ScrollContainer + ?Sized>(pointer: f64, container: &C, config: &AutoScrollConfig) -> (i8, f64) {
    let (start, end) = container.edges();
    let to_start = pointer - start;
    let to_end = end - pointer;
    let offset = container.scroll_offset();

    if to_end < config.threshold && to_end <= to_start {
        if offset >= container.max_scroll() {
            return (0, 0.0);
        }
        return (1, edge_speed(to_end, config));
    }
    if to_start < config.threshold {
        if offset <= 0.0 {
            return (0, 0.0);
        }
        return (-1, edge_speed(to_start, config));
    }
    (0, 0.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoScroller {
    axis: Axis,
    config: AutoScrollConfig,
    pointer: Option<f64>,
    running: bool,
}

impl AutoScroller {
    pub fn new(axis: Axis, config: AutoScrollConfig) -> Self {
        Self {
            axis,
            config,
            pointer: None,
            running: false,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed the latest pointer coordinate along this axis.
    /// Returns true when the caller must start a frame loop.
    pub fn update<C: ScrollContainer + ?Sized>(&mut self, pointer: f64, container: &C) -> bool {
        self.pointer = Some(pointer);
        let (dir, _) = velocity(pointer, container, &self.config);
        if dir == 0 || self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// One animation frame. Returns false once the loop should end.
    pub fn tick<C: ScrollContainer + ?Sized>(&mut self, container: &mut C, drag_active: bool) -> bool {
        if !self.running {
            return false;
        }
        if !drag_active {
            self.stop();
            return false;
        }
        let Some(pointer) = self.pointer else {
            self.running = false;
            return false;
        };
        let (dir, speed) = velocity(pointer, container, &self.config);
        if dir == 0 {
            self.running = false;
            return false;
        }
        let offset = container.scroll_offset();
        let next = (offset + f64::from(dir) * speed).clamp(0.0, container.max_scroll().max(0.0));
        if next == offset {
            self.running = false;
            return false;
        }
        container.set_scroll_offset(next);
        true
    }

    /// Idempotent
    pub fn stop(&mut self) {
        self.running = false;
        self.pointer = None;
    }
}
