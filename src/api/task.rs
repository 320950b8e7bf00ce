//! Task Endpoints

use kanban_dnd::model::NewTask;
use kanban_dnd::{ApiError, ApiResult, PositionUpdate, Task};

use super::{fetch_json, send_json, send_unit, HttpApi};

pub async fn list(api: &HttpApi, board_id: u32) -> ApiResult<Vec<Task>> {
    let board_id = board_id.to_string();
    fetch_json(api.get("/tasks").query([("boardId", board_id.as_str())])).await
}

pub async fn create(api: &HttpApi, task: &NewTask<'_>) -> ApiResult<Task> {
    send_json(api.post("/tasks"), task).await
}

/// Full update; also carries `kanbanColumnId` for cross-column moves
pub async fn update(api: &HttpApi, task: &Task) -> ApiResult<Task> {
    let Some(id) = task.id else {
        return Err(ApiError::NotFound("unsaved task".to_string()));
    };
    send_json(api.put(&format!("/tasks/{}", id)), task).await
}

pub async fn delete(api: &HttpApi, id: u32) -> ApiResult<()> {
    send_unit::<()>(api.delete(&format!("/tasks/{}", id)), None).await
}

pub async fn reorder(api: &HttpApi, updates: &[PositionUpdate]) -> ApiResult<()> {
    send_unit(api.put("/tasks/reorder"), Some(updates)).await
}
