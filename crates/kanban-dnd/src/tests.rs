//! Engine and Service Scenarios
//!
//! Drives the engine, drafts and services against an in-memory API.

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::api::KanbanApi;
    use crate::backends::{BoardBackend, ColumnBackend, TaskBackend};
    use crate::draft::ColumnDrafts;
    use crate::engine::{ListState, ReorderEngine, SharedList};
    use crate::entity::{in_scope, is_dense};
    use crate::error::{ApiError, ApiResult};
    use crate::index::{DragSource, DropOutcome};
    use crate::model::{Board, Column, NewColumn, NewTask, PositionUpdate, Task};
    use crate::notify::SharedNotifications;
    use crate::pulse::{PulseCause, PulseSink};
    use crate::services::{BoardService, TaskService};

    #[derive(Default)]
    struct FakeApi {
        fail: Cell<bool>,
        /// Fail only this call
        fail_on: Cell<Option<&'static str>>,
        next_id: Cell<u32>,
        boards: RefCell<Vec<Board>>,
        calls: RefCell<Vec<String>>,
        last_updates: RefCell<Vec<PositionUpdate>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeApi {
        fn failing() -> Self {
            let api = Self::default();
            api.fail.set(true);
            api
        }

        fn failing_on(call: &'static str) -> Self {
            let api = Self::default();
            api.fail_on.set(Some(call));
            api
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn next_id(&self) -> u32 {
            self.next_id.set(self.next_id.get() + 1);
            100 + self.next_id.get()
        }

        async fn hit(&self, call: &str) -> ApiResult<()> {
            let gate = self.gate.borrow_mut().take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            self.calls.borrow_mut().push(call.to_string());
            if self.fail.get() || self.fail_on.get() == Some(call) {
                Err(ApiError::http(500, "server error"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait(?Send)]
    impl KanbanApi for FakeApi {
        async fn list_boards(&self) -> ApiResult<Vec<Board>> {
            self.hit("list_boards").await?;
            Ok(self.boards.borrow().clone())
        }

        async fn create_board(&self, name: &str) -> ApiResult<Board> {
            self.hit("create_board").await?;
            Ok(Board { id: Some(self.next_id()), name: name.to_string(), position: 0 })
        }

        async fn update_board(&self, board: &Board) -> ApiResult<Board> {
            self.hit("update_board").await?;
            Ok(board.clone())
        }

        async fn delete_board(&self, _id: u32) -> ApiResult<()> {
            self.hit("delete_board").await
        }

        async fn reorder_boards(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
            *self.last_updates.borrow_mut() = updates.to_vec();
            self.hit("reorder_boards").await
        }

        async fn list_columns(&self, _board_id: u32) -> ApiResult<Vec<Column>> {
            self.hit("list_columns").await?;
            Ok(Vec::new())
        }

        async fn create_column(&self, column: &NewColumn<'_>) -> ApiResult<Column> {
            self.hit("create_column").await?;
            Ok(Column::new(self.next_id(), column.board_id, column.name, column.position))
        }

        async fn update_column(&self, column: &Column) -> ApiResult<Column> {
            self.hit("update_column").await?;
            Ok(column.clone())
        }

        async fn delete_column(&self, _id: u32) -> ApiResult<()> {
            self.hit("delete_column").await
        }

        async fn reorder_columns(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
            *self.last_updates.borrow_mut() = updates.to_vec();
            self.hit("reorder_columns").await
        }

        async fn list_tasks(&self, _board_id: u32) -> ApiResult<Vec<Task>> {
            self.hit("list_tasks").await?;
            Ok(Vec::new())
        }

        async fn create_task(&self, task: &NewTask<'_>) -> ApiResult<Task> {
            self.hit("create_task").await?;
            let mut created = Task::new(self.next_id(), task.kanban_column_id, task.title, task.position);
            created.description = task.description.to_string();
            created.due_date = task.due_date;
            Ok(created)
        }

        async fn update_task(&self, task: &Task) -> ApiResult<Task> {
            self.hit("update_task").await?;
            Ok(task.clone())
        }

        async fn delete_task(&self, _id: u32) -> ApiResult<()> {
            self.hit("delete_task").await
        }

        async fn reorder_tasks(&self, updates: &[PositionUpdate]) -> ApiResult<()> {
            *self.last_updates.borrow_mut() = updates.to_vec();
            self.hit("reorder_tasks").await
        }

        async fn delete_attachment(&self, _task_id: u32, _file_name: &str) -> ApiResult<()> {
            self.hit("delete_attachment").await
        }

        fn attachment_url(&self, task_id: u32, file_name: &str) -> String {
            format!("/tasks/{}/attachments/{}", task_id, file_name)
        }
    }

    #[derive(Clone, Default)]
    struct RecordedPulses(Rc<RefCell<Vec<(PulseCause, u32)>>>);

    impl PulseSink for RecordedPulses {
        fn pulse(&self, cause: PulseCause, id: u32) {
            self.0.borrow_mut().push((cause, id));
        }
    }

    fn task_engine(
        list: &SharedList<Task>,
        api: &Rc<FakeApi>,
        notes: &SharedNotifications,
    ) -> ReorderEngine<SharedList<Task>, TaskBackend<FakeApi>, SharedNotifications> {
        ReorderEngine::new(list.clone(), TaskBackend::new(Rc::clone(api)), notes.clone())
    }

    /// Column 1: A(1) B(2) C(3); column 2: D(4) E(5)
    fn board_tasks() -> Vec<Task> {
        vec![
            Task::new(1, 1, "A", 0),
            Task::new(2, 1, "B", 1),
            Task::new(3, 1, "C", 2),
            Task::new(4, 2, "D", 0),
            Task::new(5, 2, "E", 1),
        ]
    }

    fn column_ids(list: &SharedList<Task>, column: u32) -> Vec<u32> {
        in_scope(&list.snapshot(), column).iter().filter_map(|t| t.id).collect()
    }

    fn positions(list: &SharedList<Task>, column: u32) -> Vec<i32> {
        in_scope(&list.snapshot(), column).iter().map(|t| t.position).collect()
    }

    #[tokio::test]
    async fn test_drop_to_top_reorders_and_persists() {
        let list = SharedList::new(board_tasks());
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        let outcome = engine.drop_on(DragSource { id: 2, scope: 1 }, 1, 0).await.unwrap();

        assert_eq!(outcome, DropOutcome::Reorder { from: 1, to: 0 });
        assert_eq!(column_ids(&list, 1), vec![2, 1, 3]);
        assert_eq!(positions(&list, 1), vec![0, 1, 2]);
        assert_eq!(api.calls(), vec!["reorder_tasks"]);
        assert_eq!(
            *api.last_updates.borrow(),
            vec![
                PositionUpdate { id: 2, position: 0 },
                PositionUpdate { id: 1, position: 1 },
                PositionUpdate { id: 3, position: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_move_across_columns() {
        let list = SharedList::new(vec![
            Task::new(5, 1, "T", 0),
            Task::new(6, 1, "U", 1),
            Task::new(7, 2, "V", 0),
        ]);
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        engine.move_to(5, 2, 0).await.unwrap();

        assert_eq!(column_ids(&list, 1), vec![6]);
        assert_eq!(positions(&list, 1), vec![0]);
        assert_eq!(column_ids(&list, 2), vec![5, 7]);
        assert_eq!(positions(&list, 2), vec![0, 1]);
        let moved = list.snapshot().into_iter().find(|t| t.id == Some(5)).unwrap();
        assert_eq!(moved.kanban_column_id, 2);
        assert_eq!(api.calls(), vec!["update_task", "reorder_tasks"]);
        assert!(notes.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_move_clamps_target_index() {
        let list = SharedList::new(board_tasks());
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        engine.move_to(1, 2, 99).await.unwrap();
        assert_eq!(column_ids(&list, 2), vec![4, 5, 1]);
        assert!(is_dense(&list.snapshot(), 1));
        assert!(is_dense(&list.snapshot(), 2));
    }

    #[tokio::test]
    async fn test_failed_reorder_restores_exact_list() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::failing());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        let result = engine.drop_on(DragSource { id: 3, scope: 1 }, 1, 0).await;

        assert_eq!(result, Err(ApiError::http(500, "server error")));
        assert_eq!(list.snapshot(), original);
        assert_eq!(notes.snapshot().errors().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_move_restores_both_columns() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::failing());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        assert!(engine.drop_on(DragSource { id: 1, scope: 1 }, 2, 1).await.is_err());
        assert_eq!(list.snapshot(), original);
        assert_eq!(api.calls(), vec!["update_task"]);
        assert_eq!(notes.snapshot().errors().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_reposition_after_reassign_restores_snapshot() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::failing_on("reorder_tasks"));
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        let result = engine.drop_on(DragSource { id: 1, scope: 1 }, 2, 1).await;

        assert_eq!(result, Err(ApiError::http(500, "server error")));
        assert_eq!(api.calls(), vec!["update_task", "reorder_tasks"]);
        assert_eq!(list.snapshot(), original);
        assert_eq!(notes.snapshot().errors().count(), 1);
    }

    #[tokio::test]
    async fn test_self_edge_drop_issues_no_call() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        for zone in [1, 2] {
            let outcome = engine.drop_on(DragSource { id: 2, scope: 1 }, 1, zone).await.unwrap();
            assert_eq!(outcome, DropOutcome::Cancel);
        }
        assert!(api.calls().is_empty());
        assert_eq!(list.snapshot(), original);
    }

    #[tokio::test]
    async fn test_positions_stay_dense_across_moves() {
        let list = SharedList::new(board_tasks());
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = task_engine(&list, &api, &notes);

        let moves = [(1, 2, 0), (4, 1, 5), (5, 1, 1), (3, 2, 1), (2, 2, 0), (1, 1, 0)];
        for (id, column, index) in moves {
            engine.move_to(id, column, index).await.unwrap();
            let tasks = list.snapshot();
            assert!(is_dense(&tasks, 1));
            assert!(is_dense(&tasks, 2));
            let mut ids: Vec<u32> = tasks.iter().filter_map(|t| t.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        }
    }

    #[tokio::test]
    async fn test_late_rollback_keeps_later_success() {
        let list = SharedList::new(board_tasks());
        let notes = SharedNotifications::new();

        let (release, gate) = oneshot::channel();
        let slow = Rc::new(FakeApi::failing());
        *slow.gate.borrow_mut() = Some(gate);
        let fast = Rc::new(FakeApi::default());

        let slow_engine = task_engine(&list, &slow, &notes);
        let fast_engine = task_engine(&list, &fast, &notes);

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let pending = tokio::task::spawn_local(async move {
                    slow_engine.drop_on(DragSource { id: 2, scope: 1 }, 1, 0).await
                });
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                // Slow operation applied optimistically, now waiting on the server
                assert_eq!(column_ids(&list, 1), vec![2, 1, 3]);

                fast_engine.drop_on(DragSource { id: 5, scope: 2 }, 2, 0).await.unwrap();
                release.send(()).unwrap();

                let slow_result = pending.await.unwrap();
                assert!(slow_result.is_err());
            })
            .await;

        // First operation rolled back, second one survives
        assert_eq!(column_ids(&list, 1), vec![1, 2, 3]);
        assert_eq!(column_ids(&list, 2), vec![5, 4]);
        assert!(is_dense(&list.snapshot(), 1));
        assert!(is_dense(&list.snapshot(), 2));
        assert_eq!(notes.snapshot().errors().count(), 1);
    }

    #[tokio::test]
    async fn test_column_and_board_engines_share_logic() {
        let columns = SharedList::new(vec![
            Column::new(1, 9, "Todo", 0),
            Column::new(2, 9, "Doing", 1),
            Column::new(3, 9, "Done", 2),
        ]);
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let engine = ReorderEngine::new(columns.clone(), ColumnBackend::new(Rc::clone(&api)), notes.clone());
        engine.drop_on(DragSource { id: 3, scope: 9 }, 9, 0).await.unwrap();
        let names: Vec<String> = in_scope(&columns.snapshot(), 9).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Done", "Todo", "Doing"]);

        let boards = SharedList::new(vec![
            Board { id: Some(1), name: "Home".into(), position: 0 },
            Board { id: Some(2), name: "Work".into(), position: 1 },
        ]);
        let engine = ReorderEngine::new(boards.clone(), BoardBackend::new(Rc::clone(&api)), notes.clone());
        engine.drop_on(DragSource { id: 1, scope: 0 }, 0, 2).await.unwrap();
        assert_eq!(boards.snapshot()[0].name, "Work");
        assert_eq!(api.calls(), vec!["reorder_columns", "reorder_boards"]);
    }

    #[tokio::test]
    async fn test_second_draft_resolves_first() {
        let columns = SharedList::new(vec![Column::new(1, 9, "Todo", 0)]);
        let api = Rc::new(FakeApi::default());
        let drafts = ColumnDrafts::new(columns.clone(), Rc::clone(&api));

        drafts.begin(9).await;
        assert_eq!(drafts.pending().map(|c| c.position), Some(1));
        drafts.rename("Doing");

        drafts.begin(9).await;
        let all = columns.snapshot();
        assert_eq!(all.iter().filter(|c| c.is_draft()).count(), 1);
        assert!(all.iter().any(|c| c.name == "Doing" && c.id.is_some()));
        assert_eq!(drafts.pending().map(|c| c.position), Some(2));
        assert_eq!(api.calls(), vec!["create_column"]);

        // Blank draft is dropped without a request
        assert_eq!(drafts.resolve().await, None);
        assert!(drafts.pending().is_none());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_draft_commit_is_discarded_quietly() {
        let columns = SharedList::new(Vec::new());
        let api = Rc::new(FakeApi::failing());
        let drafts = ColumnDrafts::new(columns.clone(), Rc::clone(&api));

        drafts.begin(4).await;
        drafts.rename("Backlog");
        assert_eq!(drafts.commit().await, None);
        assert!(columns.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_draft_committing_is_not_sent_twice() {
        let columns = SharedList::new(vec![Column::new(1, 4, "Todo", 0)]);
        let api = Rc::new(FakeApi::default());
        let (release, gate) = oneshot::channel();

        // Each caller builds its own handle over the shared list
        let first = ColumnDrafts::new(columns.clone(), Rc::clone(&api));
        let second = ColumnDrafts::new(columns.clone(), Rc::clone(&api));

        first.begin(4).await;
        first.rename("Backlog");
        *api.gate.borrow_mut() = Some(gate);

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let pending = tokio::task::spawn_local(async move { first.commit().await });
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                assert!(second.in_flight());
                assert_eq!(second.pending(), None);

                // Blur, drop and "add column" all land here while the create is out
                assert_eq!(second.resolve().await, None);
                assert_eq!(second.commit().await, None);
                second.begin(4).await;
                second.rename("Other");
                second.discard();

                release.send(()).unwrap();
                let created = pending.await.unwrap();
                assert_eq!(created.map(|c| c.id), Some(Some(101)));
            })
            .await;

        assert_eq!(api.calls(), vec!["create_column"]);
        let all = in_scope(&columns.snapshot(), 4);
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|c| !c.is_draft()));
        assert_eq!(all[1].name, "Backlog");
        assert_eq!(all[1].position, 1);
        assert!(!second.in_flight());
    }

    #[tokio::test]
    async fn test_failed_committing_draft_is_removed() {
        let columns = SharedList::new(Vec::new());
        let api = Rc::new(FakeApi::failing());
        let (release, gate) = oneshot::channel();
        let first = ColumnDrafts::new(columns.clone(), Rc::clone(&api));
        let second = ColumnDrafts::new(columns.clone(), Rc::clone(&api));

        first.begin(4).await;
        first.rename("Backlog");
        *api.gate.borrow_mut() = Some(gate);

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let pending = tokio::task::spawn_local(async move { first.commit().await });
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                // Discard only touches an open draft
                second.discard();
                assert_eq!(columns.snapshot().len(), 1);

                release.send(()).unwrap();
                assert_eq!(pending.await.unwrap(), None);
            })
            .await;

        assert!(columns.snapshot().is_empty());
        assert_eq!(api.calls(), vec!["create_column"]);
    }

    #[tokio::test]
    async fn test_task_service_create_save_delete() {
        let list = SharedList::new(board_tasks());
        let api = Rc::new(FakeApi::default());
        let notes = SharedNotifications::new();
        let pulses = RecordedPulses::default();
        let service = TaskService::new(list.clone(), Rc::clone(&api), notes.clone(), pulses.clone());

        let created = service.create(2, "  F ", "", None).await.unwrap();
        let new_id = created.id.unwrap();
        assert_eq!(created.position, 2);
        assert_eq!(column_ids(&list, 2), vec![4, 5, new_id]);

        service.set_editing(4, true);
        let mut edited = list.snapshot().into_iter().find(|t| t.id == Some(4)).unwrap();
        assert!(edited.is_editing);
        edited.title = "D2".into();
        let saved = service.save(edited).await.unwrap();
        assert!(!saved.is_editing);

        service.delete(1).await.unwrap();
        assert_eq!(column_ids(&list, 1), vec![2, 3]);
        assert_eq!(positions(&list, 1), vec![0, 1]);

        assert_eq!(
            *pulses.0.borrow(),
            vec![(PulseCause::Created, new_id), (PulseCause::Saved, 4)]
        );
        assert!(matches!(service.create(2, "   ", "", None).await, Err(ApiError::Invalid(_))));
        assert_eq!(api.calls(), vec!["create_task", "update_task", "delete_task"]);
    }

    #[tokio::test]
    async fn test_task_service_rolls_back_failures() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::failing());
        let notes = SharedNotifications::new();
        let service = TaskService::new(list.clone(), Rc::clone(&api), notes.clone(), RecordedPulses::default());

        assert!(service.delete(2).await.is_err());
        assert_eq!(list.snapshot(), original);

        assert!(service.toggle_completed(3).await.is_err());
        assert_eq!(list.snapshot(), original);

        assert_eq!(notes.snapshot().errors().count(), 2);
    }

    #[tokio::test]
    async fn test_save_does_not_bring_back_removed_task() {
        for fail in [true, false] {
            let list = SharedList::new(board_tasks());
            let api = Rc::new(FakeApi::default());
            api.fail.set(fail);
            let (release, gate) = oneshot::channel();
            *api.gate.borrow_mut() = Some(gate);
            let notes = SharedNotifications::new();
            let service = TaskService::new(list.clone(), Rc::clone(&api), notes.clone(), RecordedPulses::default());

            let mut edited = list.snapshot().into_iter().find(|t| t.id == Some(4)).unwrap();
            edited.title = "D2".into();

            let local = tokio::task::LocalSet::new();
            local
                .run_until(async {
                    let pending = tokio::task::spawn_local(async move { service.save(edited).await });
                    for _ in 0..3 {
                        tokio::task::yield_now().await;
                    }
                    assert_eq!(column_ids(&list, 2), vec![4, 5]);

                    // A reload without task 4 lands while the save is out
                    let reloaded: Vec<Task> = board_tasks()
                        .into_iter()
                        .filter(|t| t.id != Some(4))
                        .map(|mut t| {
                            if t.id == Some(5) {
                                t.position = 0;
                            }
                            t
                        })
                        .collect();
                    list.replace(reloaded.clone());

                    release.send(()).unwrap();
                    assert_eq!(pending.await.unwrap().is_err(), fail);
                    assert_eq!(list.snapshot(), reloaded);
                })
                .await;

            assert_eq!(column_ids(&list, 2), vec![5]);
            assert_eq!(notes.snapshot().errors().count(), usize::from(fail));
        }
    }

    #[tokio::test]
    async fn test_failed_delete_comes_back_once() {
        let original = board_tasks();
        let list = SharedList::new(original.clone());
        let api = Rc::new(FakeApi::failing());
        let (release, gate) = oneshot::channel();
        *api.gate.borrow_mut() = Some(gate);
        let service = TaskService::new(list.clone(), Rc::clone(&api), SharedNotifications::new(), RecordedPulses::default());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let pending = tokio::task::spawn_local(async move { service.delete(4).await });
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                assert_eq!(column_ids(&list, 2), vec![5]);

                // A reload already brought it back
                list.replace(original.clone());
                release.send(()).unwrap();
                assert!(pending.await.unwrap().is_err());
            })
            .await;

        assert_eq!(list.snapshot(), original);
    }

    #[tokio::test]
    async fn test_board_service_load_and_create() {
        let boards = SharedList::new(Vec::new());
        let api = Rc::new(FakeApi::default());
        *api.boards.borrow_mut() = vec![
            Board { id: Some(3), name: "Work".into(), position: 0 },
            Board { id: Some(1), name: "Home".into(), position: 0 },
        ];
        let pulses = RecordedPulses::default();
        let service = BoardService::new(boards.clone(), Rc::clone(&api), SharedNotifications::new(), pulses.clone());

        service.load().await.unwrap();
        let positions: Vec<i32> = boards.snapshot().iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0, 1]);

        let created = service.create("Side").await.unwrap();
        assert_eq!(created.position, 2);
        assert_eq!(pulses.0.borrow().len(), 1);

        assert!(matches!(service.create("  ").await, Err(ApiError::Invalid(_))));
        assert!(matches!(service.rename(3, "").await, Err(ApiError::Invalid(_))));
        assert_eq!(api.calls(), vec!["list_boards", "create_board"]);
    }
}
