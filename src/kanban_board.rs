use crate::board::{Board, MoveTask, TaskEdit};
use crate::column::{Column, ColumnId};
use crate::error::{BoardError, Result, StorageError};
use crate::task::{Task, TaskIdSource, UuidTaskIds};

/// Called with the new board after every accepted mutation.
pub trait BoardObserver {
    fn board_changed(&mut self, board: &Board) -> std::result::Result<(), StorageError>;
}

impl<F: FnMut(&Board)> BoardObserver for F {
    fn board_changed(&mut self, board: &Board) -> std::result::Result<(), StorageError> {
        self(board);
        Ok(())
    }
}

/// Owns the current board. All changes go through here so observers see each
/// accepted state exactly once.
pub struct KanbanBoard {
    board: Board,
    ids: Box<dyn TaskIdSource>,
    observers: Vec<Box<dyn BoardObserver>>,
    /// Observer failures not yet shown to the user.
    failures: Vec<StorageError>,
}

impl KanbanBoard {
    pub fn new(board: Board) -> Self {
        Self::with_ids(board, UuidTaskIds)
    }

    pub fn with_ids(board: Board, ids: impl TaskIdSource + 'static) -> Self {
        Self {
            board,
            ids: Box::new(ids),
            observers: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Drains the observer failures collected since the last call. The
    /// mutations behind them still hold in memory.
    pub fn take_failures(&mut self) -> Vec<StorageError> {
        std::mem::take(&mut self.failures)
    }

    fn commit(&mut self, next: Board) {
        self.board = next;
        for observer in &mut self.observers {
            if let Err(err) = observer.board_changed(&self.board) {
                self.failures.push(err);
            }
        }
    }

    fn apply(&mut self, op: &str, result: Result<Board>) -> Result<()> {
        match result {
            Ok(next) => {
                tracing::debug!(op, "board updated");
                self.commit(next);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(op, error = %err, "board update rejected");
                Err(err)
            }
        }
    }

    pub fn add_column(&mut self, title: &str, color: &str) -> Result<Column> {
        let next = self.board.add_column(title, color);
        self.apply("add column", next)?;
        self.board
            .column_by_title(title)
            .cloned()
            .ok_or_else(|| BoardError::column_not_found(title))
    }

    pub fn delete_column(&mut self, title: &str) -> Result<()> {
        let next = self.board.delete_column(title);
        self.apply("delete column", next)
    }

    pub fn add_task(
        &mut self,
        column_id: ColumnId,
        title: &str,
        description: &str,
    ) -> Result<Task> {
        let id = self.ids.next_id();
        let next = self.board.add_task(column_id, id.clone(), title, description);
        self.apply("add task", next)?;
        self.board
            .find_task(&id)
            .map(|(_, task)| task.clone())
            .ok_or_else(|| BoardError::task_not_found(&id))
    }

    pub fn update_task(
        &mut self,
        column_id: ColumnId,
        task_id: &str,
        edit: &TaskEdit,
    ) -> Result<()> {
        let next = self.board.update_task(column_id, task_id, edit);
        self.apply("update task", next)
    }

    pub fn delete_task(&mut self, column_id: ColumnId, task_id: &str) {
        let present = self
            .board
            .column(column_id)
            .is_some_and(|column| column.task(task_id).is_some());
        if !present {
            tracing::debug!(column_id, task_id, "no task to delete");
            return;
        }
        let next = self.board.delete_task(column_id, task_id);
        tracing::debug!(column_id, task_id, "task deleted");
        self.commit(next);
    }

    pub fn move_task(&mut self, request: &MoveTask) -> Result<()> {
        let next = self.board.move_task(request);
        self.apply("move task", next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::SequentialTaskIds;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (KanbanBoard, Rc<RefCell<Vec<Board>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store =
            KanbanBoard::with_ids(Board::seed(), SequentialTaskIds::starting_at(100));
        let sink = Rc::clone(&seen);
        store.subscribe(move |board: &Board| sink.borrow_mut().push(board.clone()));
        (store, seen)
    }

    #[test]
    fn test_observer_sees_each_accepted_change() {
        let (mut store, seen) = recording_store();
        store.add_column("Review", "#cce8e1").unwrap();
        let task = store.add_task(4, "Check", "Look it over").unwrap();
        assert_eq!(task.id, "100");
        assert_eq!(task.status, "Review");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], *store.board());
    }

    #[test]
    fn test_rejection_does_not_notify() {
        let (mut store, seen) = recording_store();
        let before = store.board().clone();
        assert_eq!(
            store.add_column("Todo", "").unwrap_err(),
            BoardError::DuplicateTitle { title: "Todo".into() }
        );
        assert!(store.add_task(1, "", "d").is_err());
        assert_eq!(*store.board(), before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_add_column_returns_new_column() {
        let (mut store, _) = recording_store();
        let column = store.add_column("Review", "#cce8e1").unwrap();
        assert_eq!(column.id, 4);
        assert!(column.tasks.is_empty());
        assert_eq!(store.board().columns().len(), 4);
    }

    #[test]
    fn test_move_and_delete_notify() {
        let (mut store, seen) = recording_store();
        store
            .move_task(&MoveTask {
                task_id: "2".into(),
                source_column_id: 2,
                target_column_id: 3,
                before_task_id: None,
            })
            .unwrap();
        store.delete_task(3, "2");
        assert_eq!(seen.borrow().len(), 2);
        assert!(store.board().find_task("2").is_none());
    }

    #[test]
    fn test_deleting_missing_task_does_not_notify() {
        let (mut store, seen) = recording_store();
        store.delete_task(1, "2");
        store.delete_task(9, "1");
        assert_eq!(*store.board(), Board::seed());
        assert!(seen.borrow().is_empty());
    }

    struct Refuse;

    impl BoardObserver for Refuse {
        fn board_changed(&mut self, _: &Board) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_observer_failures_are_collected() {
        let mut store = KanbanBoard::new(Board::seed());
        store.subscribe(Refuse);
        store.delete_column("Done").unwrap();
        assert_eq!(store.board().columns().len(), 2);

        let failures = store.take_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("read-only"));
        assert!(store.take_failures().is_empty());
    }

    #[test]
    fn test_multiple_observers() {
        let count = Rc::new(RefCell::new(0));
        let mut store = KanbanBoard::new(Board::seed());
        for _ in 0..2 {
            let count = Rc::clone(&count);
            store.subscribe(move |_: &Board| *count.borrow_mut() += 1);
        }
        store.delete_column("Done").unwrap();
        assert_eq!(*count.borrow(), 2);
    }
}
