//! Column Endpoints

use kanban_dnd::model::NewColumn;
use kanban_dnd::{ApiError, ApiResult, Column, PositionUpdate};

use super::{fetch_json, send_json, send_unit, HttpApi};

pub async fn list(api: &HttpApi, board_id: u32) -> ApiResult<Vec<Column>> {
    let board_id = board_id.to_string();
    fetch_json(api.get("/columns").query([("boardId", board_id.as_str())])).await
}

pub async fn create(api: &HttpApi, column: &NewColumn<'_>) -> ApiResult<Column> {
    send_json(api.post("/columns"), column).await
}

pub async fn update(api: &HttpApi, column: &Column) -> ApiResult<Column> {
    let Some(id) = column.id else {
        return Err(ApiError::NotFound("draft column".to_string()));
    };
    send_json(api.put(&format!("/columns/{}", id)), column).await
}

pub async fn delete(api: &HttpApi, id: u32) -> ApiResult<()> {
    send_unit::<()>(api.delete(&format!("/columns/{}", id)), None).await
}

pub async fn reorder(api: &HttpApi, updates: &[PositionUpdate]) -> ApiResult<()> {
    send_unit(api.put("/columns/reorder"), Some(updates)).await
}
