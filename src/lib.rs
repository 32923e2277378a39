//! Kanban board with a terminal front end.
//!
//! [`Board`] is the document and its transitions, [`KanbanBoard`] owns the
//! live board and notifies observers such as [`storage::Persist`], and
//! [`DragSession`] turns a drag gesture into a [`MoveTask`].

pub mod app;
pub mod board;
pub mod cli;
pub mod column;
pub mod config;
pub mod drag;
pub mod error;
pub mod kanban_board;
pub mod notify;
pub mod storage;
pub mod task;
pub mod ui;

pub use board::{Board, MoveTask, TaskEdit};
pub use column::{Column, ColumnId, PALETTE};
pub use drag::{DragSession, DropTarget};
pub use error::{BoardError, ConfigError, StorageError};
pub use kanban_board::{BoardObserver, KanbanBoard};
pub use task::{Task, TaskId, TaskIdSource, UuidTaskIds};
