use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier, unique across the board.
pub type TaskId = String;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Title of the column holding this task. Kept in sync by [`crate::Board`].
    pub status: String,
    pub description: String,
}

/// Source of fresh task ids.
pub trait TaskIdSource {
    fn next_id(&mut self) -> TaskId;
}

/// Random v4 UUID, dashes stripped, base64-encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTaskIds;

impl TaskIdSource for UuidTaskIds {
    fn next_id(&mut self) -> TaskId {
        STANDARD.encode(Uuid::new_v4().simple().to_string())
    }
}

/// Counts upward from a starting value; handy for deterministic boards.
#[derive(Debug, Clone)]
pub struct SequentialTaskIds {
    next: u64,
}

impl SequentialTaskIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl TaskIdSource for SequentialTaskIds {
    fn next_id(&mut self) -> TaskId {
        let id = self.next.to_string();
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_base64_of_hex() {
        let id = UuidTaskIds.next_id();
        let decoded = STANDARD.decode(&id).unwrap();
        let hex = String::from_utf8(decoded).unwrap();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uuid_ids_do_not_repeat() {
        let mut ids = UuidTaskIds;
        let seen: HashSet<_> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialTaskIds::starting_at(5);
        assert_eq!(ids.next_id(), "5");
        assert_eq!(ids.next_id(), "6");
    }
}
