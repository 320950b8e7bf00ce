//! Realtime Reload Requests
//!
//! Server change events name a list that must be re-fetched.

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadKind {
    Boards,
    Columns,
    Tasks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadRequest {
    pub kind: ReloadKind,
    /// Board the change belongs to; None for the board list
    pub scope_id: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeEvent {
    #[serde(rename = "type")]
    kind: String,
    board_id: Option<u32>,
}

impl ReloadRequest {
    /// Parse an event payload like `{"type": "tasks", "boardId": 3}`
    pub fn parse(payload: &str) -> Option<Self> {
        let event: ChangeEvent = match serde_json::from_str(payload) {
            Ok(event) => event,
            Err(err) => {
                log::warn!("[SYNC] malformed event {:?}: {}", payload, err);
                return None;
            }
        };
        let kind = match event.kind.as_str() {
            "boards" | "board" => ReloadKind::Boards,
            "columns" | "column" => ReloadKind::Columns,
            "tasks" | "task" => ReloadKind::Tasks,
            other => {
                log::warn!("[SYNC] unknown event type {:?}", other);
                return None;
            }
        };
        if kind != ReloadKind::Boards && event.board_id.is_none() {
            log::warn!("[SYNC] {:?} event without boardId", kind);
            return None;
        }
        Some(Self {
            kind,
            scope_id: if kind == ReloadKind::Boards { None } else { event.board_id },
        })
    }

    /// Whether the open board (if any) needs this reload
    pub fn applies_to(&self, open_board: Option<u32>) -> bool {
        match self.kind {
            ReloadKind::Boards => true,
            _ => self.scope_id.is_some() && self.scope_id == open_board,
        }
    }
}
