//! Remote API Contract
//!
//! CRUD and bulk reorder endpoints for boards, columns, tasks and
//! attachments. The browser client implements this over HTTP; tests use an
//! in-memory fake.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{Board, Column, NewColumn, NewTask, PositionUpdate, Task};

#[async_trait(?Send)]
pub trait KanbanApi {
    // ========================
    // Boards
    // ========================

    async fn list_boards(&self) -> ApiResult<Vec<Board>>;

    async fn create_board(&self, name: &str) -> ApiResult<Board>;

    async fn update_board(&self, board: &Board) -> ApiResult<Board>;

    async fn delete_board(&self, id: u32) -> ApiResult<()>;

    async fn reorder_boards(&self, updates: &[PositionUpdate]) -> ApiResult<()>;

    // ========================
    // Columns
    // ========================

    async fn list_columns(&self, board_id: u32) -> ApiResult<Vec<Column>>;

    async fn create_column(&self, column: &NewColumn<'_>) -> ApiResult<Column>;

    async fn update_column(&self, column: &Column) -> ApiResult<Column>;

    async fn delete_column(&self, id: u32) -> ApiResult<()>;

    async fn reorder_columns(&self, updates: &[PositionUpdate]) -> ApiResult<()>;

    // ========================
    // Tasks
    // ========================

    /// All tasks of the board's columns
    async fn list_tasks(&self, board_id: u32) -> ApiResult<Vec<Task>>;

    async fn create_task(&self, task: &NewTask<'_>) -> ApiResult<Task>;

    /// Also used to reassign `kanbanColumnId` during a cross-column move
    async fn update_task(&self, task: &Task) -> ApiResult<Task>;

    async fn delete_task(&self, id: u32) -> ApiResult<()>;

    async fn reorder_tasks(&self, updates: &[PositionUpdate]) -> ApiResult<()>;

    // ========================
    // Attachments
    // ========================

    async fn delete_attachment(&self, task_id: u32, file_name: &str) -> ApiResult<()>;

    /// Download URL for an attachment
    fn attachment_url(&self, task_id: u32, file_name: &str) -> String;
}
