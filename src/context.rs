//! Application Context
//!
//! Shared state provided via Leptos Context API. Engines and services are
//! cheap views over these signals and are built per operation.

use std::rc::Rc;

use leptos::prelude::*;

use kanban_dnd::{
    Board, BoardBackend, BoardService, Column, ColumnBackend, ColumnDrafts, ColumnService, Config,
    DragSession, KanbanApi, Notifications, PulseRegistry, ReloadKind, ReorderEngine, Task,
    TaskBackend, TaskService,
};

use crate::api::HttpApi;
use crate::state::{PulseTimers, SignalList, TimerStore, Timers, ToastSink};

pub type TaskEngine = ReorderEngine<SignalList<Task>, TaskBackend<HttpApi>, ToastSink>;
pub type ColumnEngine = ReorderEngine<SignalList<Column>, ColumnBackend<HttpApi>, ToastSink>;
pub type BoardEngine = ReorderEngine<SignalList<Board>, BoardBackend<HttpApi>, ToastSink>;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub boards: RwSignal<Vec<Board>>,
    /// Columns of the open board, drafts included
    pub columns: RwSignal<Vec<Column>>,
    /// Tasks of the open board
    pub tasks: RwSignal<Vec<Task>>,
    pub current_board: RwSignal<Option<u32>>,
    pub session: RwSignal<DragSession>,
    pub pulses: RwSignal<PulseRegistry>,
    pub toasts: RwSignal<Notifications>,
    config: StoredValue<Config>,
    timers: TimerStore,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            boards: RwSignal::new(Vec::new()),
            columns: RwSignal::new(Vec::new()),
            tasks: RwSignal::new(Vec::new()),
            current_board: RwSignal::new(None),
            session: RwSignal::new(DragSession::new()),
            pulses: RwSignal::new(PulseRegistry::new(config.pulse_ms)),
            toasts: RwSignal::new(Notifications::new()),
            config: StoredValue::new(config),
            timers: StoredValue::new_local(Timers::default()),
        }
    }

    pub fn config(&self) -> Config {
        self.config.get_value()
    }

    pub fn api(&self) -> Rc<HttpApi> {
        Rc::new(self.config.with_value(HttpApi::new))
    }

    pub fn notifier(&self) -> ToastSink {
        ToastSink::new(self.toasts, self.config.with_value(|c| c.toast_ms), self.timers)
    }

    pub fn pulse_sink(&self) -> PulseTimers {
        PulseTimers::new(self.pulses, self.timers)
    }

    /// Cancel every pending toast and pulse timer
    pub fn cancel_timers(&self) {
        self.timers.try_update_value(|t| t.cancel_all());
    }

    // ========================
    // Engines and services
    // ========================

    pub fn task_engine(&self) -> TaskEngine {
        ReorderEngine::new(SignalList(self.tasks), TaskBackend::new(self.api()), self.notifier())
    }

    pub fn column_engine(&self) -> ColumnEngine {
        ReorderEngine::new(SignalList(self.columns), ColumnBackend::new(self.api()), self.notifier())
    }

    pub fn board_engine(&self) -> BoardEngine {
        ReorderEngine::new(SignalList(self.boards), BoardBackend::new(self.api()), self.notifier())
    }

    pub fn tasks_service(&self) -> TaskService<SignalList<Task>, HttpApi, ToastSink, PulseTimers> {
        TaskService::new(SignalList(self.tasks), self.api(), self.notifier(), self.pulse_sink())
    }

    pub fn columns_service(&self) -> ColumnService<SignalList<Column>, HttpApi, ToastSink, PulseTimers> {
        ColumnService::new(SignalList(self.columns), self.api(), self.notifier(), self.pulse_sink())
    }

    pub fn boards_service(&self) -> BoardService<SignalList<Board>, HttpApi, ToastSink, PulseTimers> {
        BoardService::new(SignalList(self.boards), self.api(), self.notifier(), self.pulse_sink())
    }

    pub fn drafts(&self) -> ColumnDrafts<SignalList<Column>, HttpApi> {
        ColumnDrafts::new(SignalList(self.columns), self.api())
    }

    // ========================
    // Reload hook
    // ========================

    /// Re-fetch one list from the server and replace it wholesale
    pub async fn reload(&self, kind: ReloadKind) {
        let board = self.current_board.get_untracked();
        log::info!("[APP] reload {:?} (board {:?})", kind, board);
        let result = match (kind, board) {
            (ReloadKind::Boards, _) => self.boards_service().load().await.map(|_| ()),
            (ReloadKind::Columns, Some(board_id)) => {
                self.drafts().resolve().await;
                self.api()
                    .list_columns(board_id)
                    .await
                    .map(|columns| self.column_engine().reload(columns))
            }
            (ReloadKind::Tasks, Some(board_id)) => self
                .api()
                .list_tasks(board_id)
                .await
                .map(|tasks| self.task_engine().reload(tasks)),
            (_, None) => Ok(()),
        };
        if let Err(err) = result {
            rolling_logger::error(&format!("[APP] reload {:?} failed: {}", kind, err));
        }
    }

    /// Switch boards and fetch the new board's columns and tasks
    pub async fn open_board(&self, board_id: Option<u32>) {
        if self.current_board.get_untracked() == board_id {
            return;
        }
        self.drafts().resolve().await;
        self.session.update(|s| s.end_drag());
        self.current_board.set(board_id);
        self.columns.set(Vec::new());
        self.tasks.set(Vec::new());
        if board_id.is_some() {
            self.reload(ReloadKind::Columns).await;
            self.reload(ReloadKind::Tasks).await;
        }
    }
}
