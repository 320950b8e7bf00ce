//! CRUD Flows
//!
//! Create/save/delete for tasks, columns and boards on top of a `KanbanApi`,
//! keeping the shared lists dense and rolling back optimistic edits the same
//! way the reorder engine does.

use std::rc::Rc;

use chrono::NaiveDate;

use crate::api::KanbanApi;
use crate::engine::ListState;
use crate::entity::{find_index, in_scope, normalize_scope, reindex, sort_by_scope, Positioned};
use crate::error::{ApiError, ApiResult};
use crate::model::{Board, Column, NewTask, Task};
use crate::notify::Notifier;
use crate::pulse::{PulseCause, PulseSink};

/// Put `original` back in place of `written` unless something newer replaced it.
///
/// `written == None` rolls back an optimistic delete and reinserts the entry.
/// Otherwise an entry that has since left the list stays gone.
fn restore_entry<T: Positioned, S: ListState<T>>(state: &S, written: Option<&T>, original: &T) {
    let Some(id) = original.key() else {
        return;
    };
    let mut items = state.snapshot();
    match (find_index(&items, id), written) {
        (Some(idx), Some(written)) => {
            if items[idx] != *written {
                return;
            }
            items[idx] = original.clone();
        }
        // Already back (a reload brought it in)
        (Some(_), None) => return,
        (None, None) => {
            let mut scoped = in_scope(&items, original.scope());
            let at = (original.position().max(0) as usize).min(scoped.len());
            scoped.insert(at, original.clone());
            reindex(&mut scoped);
            items.retain(|i| i.scope() != original.scope());
            items.extend(scoped);
        }
        (None, Some(_)) => {
            log::debug!("[CRUD] entry {} removed while its update was in flight", id);
            return;
        }
    }
    normalize_scope(&mut items, original.scope());
    state.replace(items);
}

fn replace_entry<T: Positioned, S: ListState<T>>(state: &S, item: &T) -> Option<T> {
    let id = item.key()?;
    let mut items = state.snapshot();
    let idx = find_index(&items, id)?;
    let previous = std::mem::replace(&mut items[idx], item.clone());
    sort_by_scope(&mut items);
    state.replace(items);
    Some(previous)
}

fn remove_entry<T: Positioned, S: ListState<T>>(state: &S, id: u32) -> Option<T> {
    let mut items = state.snapshot();
    let idx = find_index(&items, id)?;
    let removed = items.remove(idx);
    normalize_scope(&mut items, removed.scope());
    state.replace(items);
    Some(removed)
}

// ========================
// Tasks
// ========================

pub struct TaskService<S, A: ?Sized, N, P> {
    tasks: S,
    api: Rc<A>,
    notifier: N,
    pulses: P,
}

impl<S, A, N, P> TaskService<S, A, N, P>
where
    S: ListState<Task>,
    A: KanbanApi + ?Sized,
    N: Notifier,
    P: PulseSink,
{
    pub fn new(tasks: S, api: Rc<A>, notifier: N, pulses: P) -> Self {
        Self { tasks, api, notifier, pulses }
    }

    /// Append a new task to the end of a column
    pub async fn create(
        &self,
        column_id: u32,
        title: &str,
        description: &str,
        due_date: Option<NaiveDate>,
    ) -> ApiResult<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Invalid("task title is empty".to_string()));
        }
        let position = in_scope(&self.tasks.snapshot(), column_id).len() as i32;
        let payload = NewTask {
            kanban_column_id: column_id,
            title,
            description,
            due_date,
            position,
        };
        match self.api.create_task(&payload).await {
            Ok(created) => {
                let mut tasks = self.tasks.snapshot();
                tasks.push(created.clone());
                normalize_scope(&mut tasks, column_id);
                self.tasks.replace(tasks);
                if let Some(id) = created.id {
                    self.pulses.pulse(PulseCause::Created, id);
                }
                Ok(created)
            }
            Err(err) => {
                self.notifier.error(&format!("Could not create the task: {}", err));
                Err(err)
            }
        }
    }

    /// Persist edited fields, leaving edit mode
    pub async fn save(&self, mut task: Task) -> ApiResult<Task> {
        let Some(id) = task.id else {
            return Err(ApiError::NotFound("unsaved task".to_string()));
        };
        task.is_editing = false;
        let Some(original) = replace_entry(&self.tasks, &task) else {
            return Err(ApiError::NotFound(format!("task {}", id)));
        };
        match self.api.update_task(&task).await {
            Ok(saved) => {
                let mut saved = saved;
                saved.is_editing = false;
                restore_entry(&self.tasks, Some(&task), &saved);
                self.pulses.pulse(PulseCause::Saved, id);
                Ok(saved)
            }
            Err(err) => {
                restore_entry(&self.tasks, Some(&task), &original);
                self.notifier.error(&format!("Could not save the task: {}", err));
                Err(err)
            }
        }
    }

    pub async fn toggle_completed(&self, id: u32) -> ApiResult<Task> {
        let Some(mut task) = self.tasks.snapshot().into_iter().find(|t| t.id == Some(id)) else {
            return Err(ApiError::NotFound(format!("task {}", id)));
        };
        task.completed = !task.completed;
        self.save(task).await
    }

    /// UI-only flag; never persisted
    pub fn set_editing(&self, id: u32, editing: bool) {
        let mut tasks = self.tasks.snapshot();
        for task in tasks.iter_mut() {
            task.is_editing = editing && task.id == Some(id);
        }
        self.tasks.replace(tasks);
    }

    pub async fn delete(&self, id: u32) -> ApiResult<()> {
        let Some(removed) = remove_entry(&self.tasks, id) else {
            return Ok(());
        };
        if let Err(err) = self.api.delete_task(id).await {
            restore_entry(&self.tasks, None, &removed);
            self.notifier.error(&format!("Could not delete the task: {}", err));
            return Err(err);
        }
        Ok(())
    }

    pub async fn remove_attachment(&self, task_id: u32, file_name: &str) -> ApiResult<()> {
        let Some(mut task) = self.tasks.snapshot().into_iter().find(|t| t.id == Some(task_id)) else {
            return Err(ApiError::NotFound(format!("task {}", task_id)));
        };
        task.attachments.retain(|name| name != file_name);
        let Some(original) = replace_entry(&self.tasks, &task) else {
            return Ok(());
        };
        if let Err(err) = self.api.delete_attachment(task_id, file_name).await {
            restore_entry(&self.tasks, Some(&task), &original);
            self.notifier.error(&format!("Could not remove {}: {}", file_name, err));
            return Err(err);
        }
        Ok(())
    }

    /// Record a finished upload
    pub fn attachment_added(&self, task_id: u32, file_name: &str) {
        let mut tasks = self.tasks.snapshot();
        if let Some(task) = tasks.iter_mut().find(|t| t.id == Some(task_id)) {
            if !task.attachments.iter().any(|n| n == file_name) {
                task.attachments.push(file_name.to_string());
            }
            self.tasks.replace(tasks);
            self.pulses.pulse(PulseCause::Saved, task_id);
        }
    }
}

// ========================
// Columns
// ========================

pub struct ColumnService<S, A: ?Sized, N, P> {
    columns: S,
    api: Rc<A>,
    notifier: N,
    pulses: P,
}

impl<S, A, N, P> ColumnService<S, A, N, P>
where
    S: ListState<Column>,
    A: KanbanApi + ?Sized,
    N: Notifier,
    P: PulseSink,
{
    pub fn new(columns: S, api: Rc<A>, notifier: N, pulses: P) -> Self {
        Self { columns, api, notifier, pulses }
    }

    pub async fn rename(&self, id: u32, name: &str) -> ApiResult<Column> {
        if name.trim().is_empty() {
            return Err(ApiError::Invalid("column name is empty".to_string()));
        }
        let Some(mut column) = self.columns.snapshot().into_iter().find(|c| c.id == Some(id)) else {
            return Err(ApiError::NotFound(format!("column {}", id)));
        };
        column.name = name.trim().to_string();
        let Some(original) = replace_entry(&self.columns, &column) else {
            return Err(ApiError::NotFound(format!("column {}", id)));
        };
        match self.api.update_column(&column).await {
            Ok(saved) => {
                restore_entry(&self.columns, Some(&column), &saved);
                self.pulses.pulse(PulseCause::Saved, id);
                Ok(saved)
            }
            Err(err) => {
                restore_entry(&self.columns, Some(&column), &original);
                self.notifier.error(&format!("Could not rename the column: {}", err));
                Err(err)
            }
        }
    }

    /// Deleting a column deletes its tasks server-side; callers reload tasks
    pub async fn delete(&self, id: u32) -> ApiResult<()> {
        let Some(removed) = remove_entry(&self.columns, id) else {
            return Ok(());
        };
        if let Err(err) = self.api.delete_column(id).await {
            restore_entry(&self.columns, None, &removed);
            self.notifier.error(&format!("Could not delete the column: {}", err));
            return Err(err);
        }
        Ok(())
    }
}

// ========================
// Boards
// ========================

pub struct BoardService<S, A: ?Sized, N, P> {
    boards: S,
    api: Rc<A>,
    notifier: N,
    pulses: P,
}

impl<S, A, N, P> BoardService<S, A, N, P>
where
    S: ListState<Board>,
    A: KanbanApi + ?Sized,
    N: Notifier,
    P: PulseSink,
{
    pub fn new(boards: S, api: Rc<A>, notifier: N, pulses: P) -> Self {
        Self { boards, api, notifier, pulses }
    }

    /// Fetch boards; their order is the API's array order
    pub async fn load(&self) -> ApiResult<Vec<Board>> {
        let mut boards = self.api.list_boards().await?;
        reindex(&mut boards);
        self.boards.replace(boards.clone());
        Ok(boards)
    }

    pub async fn create(&self, name: &str) -> ApiResult<Board> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Invalid("board name is empty".to_string()));
        }
        match self.api.create_board(name).await {
            Ok(mut created) => {
                let mut boards = self.boards.snapshot();
                created.position = boards.len() as i32;
                boards.push(created.clone());
                self.boards.replace(boards);
                if let Some(id) = created.id {
                    self.pulses.pulse(PulseCause::Created, id);
                }
                Ok(created)
            }
            Err(err) => {
                self.notifier.error(&format!("Could not create the board: {}", err));
                Err(err)
            }
        }
    }

    pub async fn rename(&self, id: u32, name: &str) -> ApiResult<Board> {
        if name.trim().is_empty() {
            return Err(ApiError::Invalid("board name is empty".to_string()));
        }
        let Some(mut board) = self.boards.snapshot().into_iter().find(|b| b.id == Some(id)) else {
            return Err(ApiError::NotFound(format!("board {}", id)));
        };
        board.name = name.trim().to_string();
        let Some(original) = replace_entry(&self.boards, &board) else {
            return Err(ApiError::NotFound(format!("board {}", id)));
        };
        match self.api.update_board(&board).await {
            Ok(mut saved) => {
                saved.position = board.position;
                restore_entry(&self.boards, Some(&board), &saved);
                self.pulses.pulse(PulseCause::Saved, id);
                Ok(saved)
            }
            Err(err) => {
                restore_entry(&self.boards, Some(&board), &original);
                self.notifier.error(&format!("Could not rename the board: {}", err));
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: u32) -> ApiResult<()> {
        let Some(removed) = remove_entry(&self.boards, id) else {
            return Ok(());
        };
        if let Err(err) = self.api.delete_board(id).await {
            restore_entry(&self.boards, None, &removed);
            self.notifier.error(&format!("Could not delete the board: {}", err));
            return Err(err);
        }
        Ok(())
    }
}
