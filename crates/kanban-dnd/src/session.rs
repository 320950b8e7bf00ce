//! Drag Session Registry
//!
//! Tracks the single active drag (if any). A new drag preempts the old one.

use crate::index::DragSource;

/// Category of the active drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Task,
    Column,
    Board,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskDrag {
    pub task_id: u32,
    pub source_column_id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDrag {
    pub column_id: u32,
    pub board_id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardDrag {
    pub board_id: u32,
}

/// Files dragged in from outside the page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileDrag {
    pub target_task_id: Option<u32>,
}

/// Kind-specific drag context. Holding one variant means every other kind's
/// context is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragContext {
    Task(TaskDrag),
    Column(ColumnDrag),
    Board(BoardDrag),
    File(FileDrag),
}

impl DragContext {
    pub fn kind(&self) -> DragKind {
        match self {
            DragContext::Task(_) => DragKind::Task,
            DragContext::Column(_) => DragKind::Column,
            DragContext::Board(_) => DragKind::Board,
            DragContext::File(_) => DragKind::File,
        }
    }

    /// Id of the dragged entity and the scope it comes from
    pub fn source(&self) -> Option<(u32, u32)> {
        match *self {
            DragContext::Task(t) => Some((t.task_id, t.source_column_id)),
            DragContext::Column(c) => Some((c.column_id, c.board_id)),
            DragContext::Board(b) => Some((b.board_id, crate::model::BOARD_SCOPE)),
            DragContext::File(_) => None,
        }
    }
}

/// Insertion slot currently under the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverZone {
    /// Drags this slot accepts
    pub kind: DragKind,
    pub scope: u32,
    /// Insert before position `zone`; `zone == len` appends
    pub zone: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragSession {
    active: Option<DragContext>,
    hovered_zone: Option<HoverZone>,
    hovered_column: Option<u32>,
    preview_size: Option<(f64, f64)>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag, overwriting whatever was active
    pub fn start_drag(&mut self, context: DragContext) {
        if let Some(previous) = self.active {
            log::debug!("[DND] preempting {:?} drag with {:?}", previous.kind(), context.kind());
        }
        self.active = Some(context);
        self.hovered_zone = None;
        self.hovered_column = None;
    }

    pub fn is_drag(&self, kind: DragKind) -> bool {
        matches!(self.active, Some(ctx) if ctx.kind() == kind)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<DragContext> {
        self.active
    }

    /// Clear the drag and everything hanging off it. Safe when idle.
    pub fn end_drag(&mut self) {
        self.active = None;
        self.hovered_zone = None;
        self.hovered_column = None;
        self.preview_size = None;
    }

    pub fn task(&self) -> Option<TaskDrag> {
        match self.active {
            Some(DragContext::Task(t)) => Some(t),
            _ => None,
        }
    }

    pub fn column(&self) -> Option<ColumnDrag> {
        match self.active {
            Some(DragContext::Column(c)) => Some(c),
            _ => None,
        }
    }

    pub fn board(&self) -> Option<BoardDrag> {
        match self.active {
            Some(DragContext::Board(b)) => Some(b),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<FileDrag> {
        match self.active {
            Some(DragContext::File(f)) => Some(f),
            _ => None,
        }
    }

    /// Ignored unless a task drag is active
    pub fn set_hovered_column(&mut self, column_id: Option<u32>) {
        if self.is_drag(DragKind::Task) {
            self.hovered_column = column_id;
        }
    }

    pub fn hovered_column(&self) -> Option<u32> {
        self.hovered_column
    }

    /// Ignored when nothing is being dragged, or when the zone belongs to
    /// another kind of drag
    pub fn set_hovered_zone(&mut self, zone: Option<HoverZone>) {
        match zone {
            Some(z) if !self.is_drag(z.kind) => {}
            _ if self.active.is_none() => {}
            _ => self.hovered_zone = zone,
        }
    }

    pub fn hovered_zone(&self) -> Option<HoverZone> {
        self.hovered_zone
    }

    /// Hovered zone index when it lies in `scope` and takes `kind`
    pub fn hovered_zone_in(&self, kind: DragKind, scope: u32) -> Option<usize> {
        self.hovered_zone
            .filter(|z| z.kind == kind && z.scope == scope)
            .map(|z| z.zone)
    }

    /// The dragged entity when the active drag is of `kind`
    pub fn source_of(&self, kind: DragKind) -> Option<DragSource> {
        let context = self.active.filter(|c| c.kind() == kind)?;
        let (id, scope) = context.source()?;
        Some(DragSource { id, scope })
    }

    pub fn set_preview_size(&mut self, width: f64, height: f64) {
        self.preview_size = Some((width, height));
    }

    pub fn preview_size(&self) -> Option<(f64, f64)> {
        self.preview_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_ctx() -> DragContext {
        DragContext::Task(TaskDrag { task_id: 1, source_column_id: 10 })
    }

    #[test]
    fn test_new_drag_preempts_previous() {
        let mut session = DragSession::new();
        session.start_drag(task_ctx());
        session.start_drag(DragContext::Column(ColumnDrag { column_id: 3, board_id: 1 }));

        assert!(session.is_drag(DragKind::Column));
        assert!(!session.is_drag(DragKind::Task));
        assert_eq!(session.task(), None);
        assert_eq!(session.column().map(|c| c.column_id), Some(3));
    }

    #[test]
    fn test_end_drag_clears_everything() {
        let mut session = DragSession::new();
        session.start_drag(task_ctx());
        session.set_hovered_column(Some(10));
        session.set_hovered_zone(Some(HoverZone { kind: DragKind::Task, scope: 10, zone: 2 }));
        session.set_preview_size(120.0, 40.0);

        session.end_drag();
        assert_eq!(session, DragSession::default());

        // idle end is a no-op
        session.end_drag();
        assert!(!session.is_active());
    }

    #[test]
    fn test_zone_of_other_kind_is_ignored() {
        let mut session = DragSession::new();
        session.start_drag(task_ctx());

        // A board zone under a task drag must not become the drop target
        session.set_hovered_zone(Some(HoverZone { kind: DragKind::Board, scope: 0, zone: 1 }));
        assert_eq!(session.hovered_zone(), None);

        let zone = HoverZone { kind: DragKind::Task, scope: 10, zone: 1 };
        session.set_hovered_zone(Some(zone));
        assert_eq!(session.hovered_zone(), Some(zone));
        assert_eq!(session.hovered_zone_in(DragKind::Task, 10), Some(1));
        assert_eq!(session.hovered_zone_in(DragKind::Task, 11), None);
        assert_eq!(session.hovered_zone_in(DragKind::Column, 10), None);

        session.set_hovered_zone(None);
        assert_eq!(session.hovered_zone(), None);
    }

    #[test]
    fn test_source_of_active_kind() {
        let mut session = DragSession::new();
        assert_eq!(session.source_of(DragKind::Task), None);

        session.start_drag(task_ctx());
        assert_eq!(session.source_of(DragKind::Task), Some(DragSource { id: 1, scope: 10 }));
        assert_eq!(session.source_of(DragKind::Column), None);

        session.start_drag(DragContext::File(FileDrag { target_task_id: Some(1) }));
        assert_eq!(session.source_of(DragKind::File), None);
    }

    #[test]
    fn test_hovered_column_requires_task_drag() {
        let mut session = DragSession::new();
        session.set_hovered_column(Some(4));
        assert_eq!(session.hovered_column(), None);

        session.start_drag(DragContext::Board(BoardDrag { board_id: 2 }));
        session.set_hovered_column(Some(4));
        assert_eq!(session.hovered_column(), None);

        session.start_drag(task_ctx());
        session.set_hovered_column(Some(4));
        assert_eq!(session.hovered_column(), Some(4));
    }
}
