use crate::task::Task;
use serde::{Deserialize, Serialize};

pub type ColumnId = u32;

/// Colours offered when creating a column.
pub const PALETTE: [&str; 3] = ["#ffcbd7", "#fce1a1", "#cce8e1"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    /// Unique across the board; doubles as the status of every task inside.
    pub title: String,
    pub color: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: color.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}
