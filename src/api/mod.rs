//! REST Client
//!
//! `KanbanApi` over HTTP, organized by resource like the server's routes.

mod attachment;
mod board;
mod column;
mod task;

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use kanban_dnd::model::{NewColumn, NewTask};
use kanban_dnd::{ApiError, ApiResult, Board, Column, Config, KanbanApi, PositionUpdate, Task};

pub use attachment::upload_attachment;

/// Browser HTTP client for the kanban API
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.api_base.clone(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::get(&self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::post(&self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::put(&self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::delete(&self.url(path)))
    }
}

// ========================
// Response handling
// ========================

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn decode(err: gloo_net::Error) -> ApiError {
    ApiError::Decode(err.to_string())
}

/// Turn transport failures and non-2xx statuses into `ApiError`
async fn checked(sent: Result<Response, gloo_net::Error>) -> ApiResult<Response> {
    let response = sent.map_err(network)?;
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::warn!("[API] {} {} -> {}", response.url(), status, body);
    Err(ApiError::http(status, body))
}

pub(crate) async fn fetch_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
    let response = checked(builder.send().await).await?;
    response.json::<T>().await.map_err(decode)
}

pub(crate) async fn send_json<B, T>(builder: RequestBuilder, body: &B) -> ApiResult<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let request = builder.json(body).map_err(decode)?;
    let response = checked(request.send().await).await?;
    response.json::<T>().await.map_err(decode)
}

/// For endpoints that answer with no content
pub(crate) async fn send_unit<B: Serialize + ?Sized>(builder: RequestBuilder, body: Option<&B>) -> ApiResult<()> {
    let sent = match body {
        Some(body) => builder.json(body).map_err(decode)?.send().await,
        None => builder.send().await,
    };
    checked(sent).await.map(|_| ())
}

#[async_trait(?Send)]
impl KanbanApi for HttpApi {
    async fn list_boards(&self) -> ApiResult<Vec<Board>> {
        board::list(self).await
    }

    async fn create_board(&self, name: &str) -> ApiResult<Board> {
        board::create(self, name).await
    }

    async fn update_board(&self, board: &Board) -> ApiResult<Board> {
        board::update(self, board).await
    }

    async fn delete_board(&self, id: u32) -> ApiResult<()> {
        board::delete(self, id).await
    }

    async fn reorder_boards(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        board::reorder(self, updates).await
    }

    async fn list_columns(&self, board_id: u32) -> ApiResult<Vec<Column>> {
        column::list(self, board_id).await
    }

    async fn create_column(&self, new_column: &NewColumn<'_>) -> ApiResult<Column> {
        column::create(self, new_column).await
    }

    async fn update_column(&self, column: &Column) -> ApiResult<Column> {
        column::update(self, column).await
    }

    async fn delete_column(&self, id: u32) -> ApiResult<()> {
        column::delete(self, id).await
    }

    async fn reorder_columns(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        column::reorder(self, updates).await
    }

    async fn list_tasks(&self, board_id: u32) -> ApiResult<Vec<Task>> {
        task::list(self, board_id).await
    }

    async fn create_task(&self, new_task: &NewTask<'_>) -> ApiResult<Task> {
        task::create(self, new_task).await
    }

    async fn update_task(&self, task: &Task) -> ApiResult<Task> {
        task::update(self, task).await
    }

    async fn delete_task(&self, id: u32) -> ApiResult<()> {
        task::delete(self, id).await
    }

    async fn reorder_tasks(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
        task::reorder(self, updates).await
    }

    async fn delete_attachment(&self, task_id: u32, file_name: &str) -> ApiResult<()> {
        attachment::delete(self, task_id, file_name).await
    }

    fn attachment_url(&self, task_id: u32, file_name: &str) -> String {
        self.url(&attachment::path(task_id, Some(file_name)))
    }
}
