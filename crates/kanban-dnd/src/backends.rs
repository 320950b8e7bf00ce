//! Per-Kind Reorder Backends
//!
//! Thin adapters binding the generic engine to the task, column and board
//! endpoints of a `KanbanApi`.

use std::rc::Rc;

use async_trait::async_trait;

use crate::api::KanbanApi;
use crate::engine::ReorderBackend;
use crate::error::{ApiError, ApiResult};
use crate::model::{Board, Column, PositionUpdate, Task};

pub struct TaskBackend<A: ?Sized> {
    api: Rc<A>,
}

impl<A: ?Sized> TaskBackend<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl<A: KanbanApi + ?Sized> ReorderBackend for TaskBackend<A> {
    type Item = Task;

    async fn reposition(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        self.api.reorder_tasks(updates).await
    }

    async fn reassign(&self, item: &Task) -> ApiResult<()> {
        if item.id.is_none() {
            return Err(ApiError::NotFound("unsaved task".to_string()));
        }
        self.api.update_task(item).await.map(|_| ())
    }
}

pub struct ColumnBackend<A: ?Sized> {
    api: Rc<A>,
}

impl<A: ?Sized> ColumnBackend<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl<A: KanbanApi + ?Sized> ReorderBackend for ColumnBackend<A> {
    type Item = Column;

    async fn reposition(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        self.api.reorder_columns(updates).await
    }

    async fn reassign(&self, item: &Column) -> ApiResult<()> {
        if item.id.is_none() {
            return Err(ApiError::NotFound("draft column".to_string()));
        }
        self.api.update_column(item).await.map(|_| ())
    }
}

pub struct BoardBackend<A: ?Sized> {
    api: Rc<A>,
}

impl<A: ?Sized> BoardBackend<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl<A: KanbanApi + ?Sized> ReorderBackend for BoardBackend<A> {
    type Item = Board;

    async fn reposition(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        self.api.reorder_boards(updates).await
    }

    /// Boards share one scope, so they never change it
    async fn reassign(&self, _item: &Board) -> ApiResult<()> {
        Ok(())
    }
}
