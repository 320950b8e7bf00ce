//! Kanban Models
//!
//! Data structures mirroring the REST API's boards, columns and tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Positioned;

/// Boards share a single ordering scope
pub const BOARD_SCOPE: u32 = 0;

/// Board data structure (matches API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// None while the board is an unsaved draft
    pub id: Option<u32>,
    pub name: String,
    /// Implicit in the API's array order
    #[serde(default)]
    pub position: i32,
}

/// Column data structure (matches API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// None while the column is a draft being named
    pub id: Option<u32>,
    pub board_id: u32,
    pub name: String,
    #[serde(default)]
    pub position: i32,
    /// UI-only: a draft whose create request is in flight
    #[serde(skip)]
    pub committing: bool,
}

impl Column {
    pub fn new(id: u32, board_id: u32, name: impl Into<String>, position: i32) -> Self {
        Self {
            id: Some(id),
            board_id,
            name: name.into(),
            position,
            committing: false,
        }
    }

    pub fn draft(board_id: u32, position: i32) -> Self {
        Self {
            id: None,
            board_id,
            name: String::new(),
            position,
            committing: false,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// A draft still open for naming
    pub fn is_open_draft(&self) -> bool {
        self.is_draft() && !self.committing
    }
}

/// Task data structure (matches API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<u32>,
    pub kanban_column_id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub position: i32,
    /// Attachment file names
    #[serde(default)]
    pub attachments: Vec<String>,
    /// UI-only inline editing flag
    #[serde(skip)]
    pub is_editing: bool,
}

impl Task {
    pub fn new(id: u32, kanban_column_id: u32, title: impl Into<String>, position: i32) -> Self {
        Self {
            id: Some(id),
            kanban_column_id,
            title: title.into(),
            description: String::new(),
            completed: false,
            due_date: None,
            position,
            attachments: Vec::new(),
            is_editing: false,
        }
    }
}

// ========================
// Request Payloads
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct NewBoard<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewColumn<'a> {
    pub board_id: u32,
    pub name: &'a str,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask<'a> {
    pub kanban_column_id: u32,
    pub title: &'a str,
    pub description: &'a str,
    pub due_date: Option<NaiveDate>,
    pub position: i32,
}

/// One entry of a bulk reorder payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: u32,
    pub position: i32,
}

// ========================
// Ordering hooks
// ========================

impl Positioned for Board {
    fn key(&self) -> Option<u32> {
        self.id
    }

    fn scope(&self) -> u32 {
        BOARD_SCOPE
    }

    fn set_scope(&mut self, _scope: u32) {}

    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

impl Positioned for Column {
    fn key(&self) -> Option<u32> {
        self.id
    }

    fn scope(&self) -> u32 {
        self.board_id
    }

    fn set_scope(&mut self, scope: u32) {
        self.board_id = scope;
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

impl Positioned for Task {
    fn key(&self) -> Option<u32> {
        self.id
    }

    fn scope(&self) -> u32 {
        self.kanban_column_id
    }

    fn set_scope(&mut self, scope: u32) {
        self.kanban_column_id = scope;
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}
