//! The board document and its transitions.
//!
//! Every transition borrows the current board and hands back a new one, so a
//! rejected operation can never leave a half-applied change behind.

use crate::column::{Column, ColumnId};
use crate::error::{BoardError, Result};
use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// Ordered columns, each holding an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    columns: Vec<Column>,
}

/// New values for a task opened in the details dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: String,
    pub description: String,
    pub status: String,
}

/// A request to relocate a task, normally produced by a finished drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTask {
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub target_column_id: ColumnId,
    /// Insert immediately before this task; append when absent or not found.
    pub before_task_id: Option<TaskId>,
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardError::ValidationFailed { field });
    }
    Ok(())
}

impl Board {
    /// Builds a board, forcing every task's status to its column title.
    pub fn new(mut columns: Vec<Column>) -> Self {
        for column in &mut columns {
            for task in &mut column.tasks {
                if task.status != column.title {
                    tracing::debug!(task = %task.id, column = %column.title, "resyncing task status");
                    task.status = column.title.clone();
                }
            }
        }
        Self { columns }
    }

    /// The board shown on first launch.
    pub fn seed() -> Self {
        let task = |id: &str, status: &str| Task {
            id: id.to_string(),
            title: format!("Item {id}"),
            status: status.to_string(),
            description: format!("Item {id} description"),
        };
        let mut todo = Column::new(1, "Todo", "#ffcbd7");
        todo.tasks = vec![task("1", "Todo")];
        let mut in_progress = Column::new(2, "In Progress", "#fce1a1");
        in_progress.tasks = vec![task("2", "In Progress"), task("3", "In Progress")];
        let mut done = Column::new(3, "Done", "#cce8e1");
        done.tasks = vec![task("4", "Done")];
        Self::new(vec![todo, in_progress, done])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.title == title)
    }

    /// Column titles in board order; these are the valid task statuses.
    pub fn titles(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.title.as_str()).collect()
    }

    pub fn find_task(&self, id: &str) -> Option<(&Column, &Task)> {
        self.columns.iter().find_map(|c| c.task(id).map(|t| (c, t)))
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    fn next_column_id(&self) -> ColumnId {
        self.columns.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    fn column_mut(&mut self, id: ColumnId) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BoardError::column_not_found(id))
    }

    pub fn add_column(&self, title: &str, color: &str) -> Result<Board> {
        require("title", title)?;
        if self.column_by_title(title).is_some() {
            return Err(BoardError::DuplicateTitle {
                title: title.to_string(),
            });
        }
        let mut next = self.clone();
        next.columns.push(Column::new(self.next_column_id(), title, color));
        Ok(next)
    }

    /// Drops the column and every task in it.
    pub fn delete_column(&self, title: &str) -> Result<Board> {
        if self.columns.len() <= 1 {
            return Err(BoardError::LastColumnRemaining);
        }
        if self.column_by_title(title).is_none() {
            return Err(BoardError::column_not_found(title));
        }
        let mut next = self.clone();
        next.columns.retain(|c| c.title != title);
        Ok(next)
    }

    /// Appends a task to the end of the column.
    pub fn add_task(
        &self,
        column_id: ColumnId,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> Result<Board> {
        require("title", title)?;
        require("description", description)?;
        let mut next = self.clone();
        let column = next.column_mut(column_id)?;
        let status = column.title.clone();
        column.tasks.push(Task {
            id,
            title: title.to_string(),
            status,
            description: description.to_string(),
        });
        Ok(next)
    }

    /// Edits a task in place, or moves it to the end of the column named by the
    /// new status. A status naming no column is rejected.
    pub fn update_task(
        &self,
        column_id: ColumnId,
        task_id: &str,
        edit: &TaskEdit,
    ) -> Result<Board> {
        require("title", &edit.title)?;
        require("description", &edit.description)?;
        require("status", &edit.status)?;

        let mut next = self.clone();
        let source = next.column_mut(column_id)?;
        let index = source
            .position_of(task_id)
            .ok_or_else(|| BoardError::task_not_found(task_id))?;

        if source.tasks[index].status == edit.status {
            let task = &mut source.tasks[index];
            task.title = edit.title.clone();
            task.description = edit.description.clone();
            return Ok(next);
        }

        let target_id = self
            .column_by_title(&edit.status)
            .map(|c| c.id)
            .ok_or_else(|| BoardError::column_not_found(&edit.status))?;

        let mut task = next.column_mut(column_id)?.tasks.remove(index);
        task.title = edit.title.clone();
        task.description = edit.description.clone();
        task.status = edit.status.clone();
        next.column_mut(target_id)?.tasks.push(task);
        Ok(next)
    }

    /// Removes the task from the column. Unknown ids leave the board as is.
    pub fn delete_task(&self, column_id: ColumnId, task_id: &str) -> Board {
        let mut next = self.clone();
        if let Ok(column) = next.column_mut(column_id) {
            column.tasks.retain(|t| t.id != task_id);
        }
        next
    }

    pub fn move_task(&self, request: &MoveTask) -> Result<Board> {
        let mut next = self.clone();
        let source = next.column_mut(request.source_column_id)?;
        let from = source
            .position_of(&request.task_id)
            .ok_or_else(|| BoardError::task_not_found(&request.task_id))?;
        let mut task = source.tasks.remove(from);

        let target = next.column_mut(request.target_column_id)?;
        task.status = target.title.clone();

        // Looked up after removal, so a drop onto the task itself appends.
        let index = request
            .before_task_id
            .as_deref()
            .and_then(|before| target.position_of(before))
            .unwrap_or(target.tasks.len());
        target.tasks.insert(index, task);
        Ok(next)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::seed()
    }
}
