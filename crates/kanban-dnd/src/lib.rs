//! Kanban DnD
//!
//! Drag-and-drop ordering for kanban boards, free of any UI framework:
//! - session: which single drag is active
//! - pulse: auto-expiring "just dropped/created/saved" markers
//! - index: hover order and drop target per scope
//! - engine: optimistic reorder/move with per-operation rollback
//! - autoscroll: edge scrolling while dragging
//! - services, draft, backends, api: persistence around the engine

pub mod api;
pub mod autoscroll;
pub mod backends;
pub mod config;
pub mod draft;
pub mod engine;
pub mod entity;
pub mod error;
pub mod index;
pub mod model;
pub mod notify;
pub mod pulse;
pub mod services;
pub mod session;
pub mod sync;

#[cfg(test)]
mod tests;

pub use api::KanbanApi;
pub use autoscroll::{AutoScrollConfig, AutoScroller, Axis, ScrollContainer};
pub use backends::{BoardBackend, ColumnBackend, TaskBackend};
pub use config::Config;
pub use draft::ColumnDrafts;
pub use engine::{ListState, ReorderBackend, ReorderEngine, SharedList};
pub use entity::Positioned;
pub use error::{ApiError, ApiResult, ConfigError};
pub use index::{DragSource, DropOutcome, ScopePreview};
pub use model::{Board, Column, PositionUpdate, Task};
pub use notify::{Notifications, Notifier, Toast, ToastLevel};
pub use pulse::{PulseCause, PulseRegistry, PulseSink};
pub use services::{BoardService, ColumnService, TaskService};
pub use session::{DragContext, DragKind, DragSession, HoverZone};
pub use sync::{ReloadKind, ReloadRequest};
