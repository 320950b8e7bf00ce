//! Board Endpoints

use kanban_dnd::model::NewBoard;
use kanban_dnd::{ApiError, ApiResult, Board, PositionUpdate};

use super::{fetch_json, send_json, send_unit, HttpApi};

pub async fn list(api: &HttpApi) -> ApiResult<Vec<Board>> {
    fetch_json(api.get("/boards")).await
}

pub async fn create(api: &HttpApi, name: &str) -> ApiResult<Board> {
    send_json(api.post("/boards"), &NewBoard { name }).await
}

pub async fn update(api: &HttpApi, board: &Board) -> ApiResult<Board> {
    let Some(id) = board.id else {
        return Err(ApiError::NotFound("unsaved board".to_string()));
    };
    send_json(api.put(&format!("/boards/{}", id)), board).await
}

pub async fn delete(api: &HttpApi, id: u32) -> ApiResult<()> {
    send_unit::<()>(api.delete(&format!("/boards/{}", id)), None).await
}

pub async fn reorder(api: &HttpApi, updates: &[PositionUpdate]) -> ApiResult<()> {
    send_unit(api.put("/boards/reorder"), Some(updates)).await
}
