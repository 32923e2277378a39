//! Drag-and-drop bookkeeping, independent of any input device.

use crate::board::MoveTask;
use crate::column::ColumnId;
use crate::task::TaskId;

/// Where a dragged task was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a column: append.
    Column(ColumnId),
    /// A task row: insert above it.
    Task { column_id: ColumnId, task_id: TaskId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
        source_column_id: ColumnId,
        hover_task_id: Option<TaskId>,
    },
}

impl DragSession {
    /// Begins a drag, replacing any session left over from an abandoned gesture.
    pub fn start(&mut self, task_id: impl Into<TaskId>, source_column_id: ColumnId) {
        *self = Self::Dragging {
            task_id: task_id.into(),
            source_column_id,
            hover_task_id: None,
        };
    }

    /// Records the task row currently under the pointer.
    pub fn enter_task(&mut self, task_id: impl Into<TaskId>) {
        if let Self::Dragging { hover_task_id, .. } = self {
            *hover_task_id = Some(task_id.into());
        }
    }

    /// Pointer left every task row while still dragging.
    pub fn leave_task(&mut self) {
        if let Self::Dragging { hover_task_id, .. } = self {
            *hover_task_id = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn dragged_task(&self) -> Option<&str> {
        match self {
            Self::Dragging { task_id, .. } => Some(task_id.as_str()),
            Self::Idle => None,
        }
    }

    pub fn hover_task(&self) -> Option<&str> {
        match self {
            Self::Dragging { hover_task_id, .. } => hover_task_id.as_deref(),
            Self::Idle => None,
        }
    }

    /// Ends the session and returns the move to perform, if a drag was active.
    pub fn drop_on(&mut self, target: DropTarget) -> Option<MoveTask> {
        let Self::Dragging {
            task_id,
            source_column_id,
            ..
        } = std::mem::take(self)
        else {
            return None;
        };
        let (target_column_id, before_task_id) = match target {
            DropTarget::Column(column_id) => (column_id, None),
            DropTarget::Task { column_id, task_id } => (column_id, Some(task_id)),
        };
        Some(MoveTask {
            task_id,
            source_column_id,
            target_column_id,
            before_task_id,
        })
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
