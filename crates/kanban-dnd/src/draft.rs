//! Draft Columns
//!
//! A board holds at most one unsaved column while the user names it. The
//! draft must be committed or discarded before anything else touches the
//! column list.

use std::rc::Rc;

use crate::api::KanbanApi;
use crate::engine::ListState;
use crate::entity::{find_index, in_scope, normalize_scope, sort_by_scope};
use crate::model::{Column, NewColumn};

pub struct ColumnDrafts<S, A: ?Sized> {
    columns: S,
    api: Rc<A>,
}

impl<S, A> ColumnDrafts<S, A>
where
    S: ListState<Column>,
    A: KanbanApi + ?Sized,
{
    pub fn new(columns: S, api: Rc<A>) -> Self {
        Self { columns, api }
    }

    /// The draft still being named, if any
    pub fn pending(&self) -> Option<Column> {
        self.columns.snapshot().into_iter().find(|c| c.is_open_draft())
    }

    /// A committed draft is waiting on its create request
    pub fn in_flight(&self) -> bool {
        self.columns.snapshot().iter().any(|c| c.is_draft() && c.committing)
    }

    /// Append a fresh draft to the board, resolving any pending one first.
    /// Does nothing while another draft remains (still committing, or added
    /// by a concurrent call).
    pub async fn begin(&self, board_id: u32) {
        if self.pending().is_some() {
            self.resolve().await;
        }
        let mut columns = self.columns.snapshot();
        if columns.iter().any(|c| c.is_draft()) {
            log::debug!("[COLUMN] draft already open on board {}", board_id);
            return;
        }
        let position = in_scope(&columns, board_id).len() as i32;
        columns.push(Column::draft(board_id, position));
        sort_by_scope(&mut columns);
        self.columns.replace(columns);
    }

    pub fn rename(&self, name: &str) {
        let mut columns = self.columns.snapshot();
        if let Some(draft) = columns.iter_mut().find(|c| c.is_open_draft()) {
            draft.name = name.to_string();
            self.columns.replace(columns);
        }
    }

    /// Drop the open draft; one that is committing is left alone
    pub fn discard(&self) {
        self.remove_draft(false);
    }

    fn remove_draft(&self, committing: bool) {
        let mut columns = self.columns.snapshot();
        let matches = |c: &Column| c.is_draft() && c.committing == committing;
        let Some(board_id) = columns.iter().find(|c| matches(*c)).map(|c| c.board_id) else {
            return;
        };
        columns.retain(|c| !matches(c));
        normalize_scope(&mut columns, board_id);
        self.columns.replace(columns);
    }

    /// Persist a named draft. Blank drafts and failed creates are dropped;
    /// the failure itself is only logged. The draft is marked committing
    /// before the request goes out, so a concurrent commit or resolve finds
    /// nothing to persist.
    pub async fn commit(&self) -> Option<Column> {
        let draft = self.pending()?;
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            self.discard();
            return None;
        }

        let mut columns = self.columns.snapshot();
        if let Some(slot) = columns.iter_mut().find(|c| c.is_open_draft()) {
            slot.committing = true;
        }
        self.columns.replace(columns);

        let payload = NewColumn {
            board_id: draft.board_id,
            name: &name,
            position: draft.position,
        };
        match self.api.create_column(&payload).await {
            Ok(created) => {
                let mut columns = self.columns.snapshot();
                let slot = columns.iter().position(|c| c.is_draft() && c.committing);
                let known = created.id.is_some_and(|id| find_index(&columns, id).is_some());
                match slot {
                    Some(idx) if known => {
                        columns.remove(idx);
                    }
                    Some(idx) => columns[idx] = created.clone(),
                    // A reload replaced the list while the request was out
                    None if !known => columns.push(created.clone()),
                    None => {}
                }
                normalize_scope(&mut columns, created.board_id);
                self.columns.replace(columns);
                log::info!("[COLUMN] created {:?} on board {}", created.id, created.board_id);
                Some(created)
            }
            Err(err) => {
                log::warn!("[COLUMN] draft create failed, discarding: {}", err);
                self.remove_draft(true);
                None
            }
        }
    }

    /// Commit a named draft or discard a blank one. A draft that is already
    /// committing is not sent again.
    pub async fn resolve(&self) -> Option<Column> {
        if self.pending().is_none() {
            return None;
        }
        self.commit().await
    }
}
