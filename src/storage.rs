//! String key-value persistence for the board.

use crate::board::Board;
use crate::error::StorageError;
use crate::kanban_board::BoardObserver;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Slot holding the serialized column array.
pub const BOARD_KEY: &str = "cols";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every slot in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file only loses the other slots, not the write.
        let mut slots = self.read_all().unwrap_or_else(|err| {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "discarding unreadable storage"
            );
            BTreeMap::new()
        });
        slots.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the board, falling back to [`Board::seed`] when the slot is missing,
/// unreadable, or holds no columns.
pub fn load_board(store: &dyn KeyValueStore) -> Board {
    let raw = match store.get(BOARD_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("no saved board, using seed");
            return Board::seed();
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to read saved board, using seed");
            return Board::seed();
        }
    };
    match serde_json::from_str::<Board>(&raw) {
        Ok(board) if board.columns().is_empty() => {
            tracing::warn!("saved board has no columns, using seed");
            Board::seed()
        }
        Ok(board) => Board::new(board.columns().to_vec()),
        Err(err) => {
            tracing::warn!(error = %err, "saved board is not valid JSON, using seed");
            Board::seed()
        }
    }
}

pub fn save_board(store: &mut dyn KeyValueStore, board: &Board) -> Result<(), StorageError> {
    store.set(BOARD_KEY, &serde_json::to_string(board)?)
}

/// Writes the whole board back to the store after every change.
pub struct Persist<S> {
    store: S,
}

impl<S: KeyValueStore> Persist<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> BoardObserver for Persist<S> {
    fn board_changed(&mut self, board: &Board) -> Result<(), StorageError> {
        match save_board(&mut self.store, board) {
            Ok(()) => {
                tracing::debug!(columns = board.columns().len(), "board saved");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save board");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_missing_slot_loads_seed() {
        assert_eq!(load_board(&MemoryStore::default()), Board::seed());
    }

    #[test]
    fn test_garbage_loads_seed() {
        let mut store = MemoryStore::default();
        store.set(BOARD_KEY, "{not json").unwrap();
        assert_eq!(load_board(&store), Board::seed());
    }

    #[test]
    fn test_empty_array_loads_seed() {
        let mut store = MemoryStore::default();
        store.set(BOARD_KEY, "[]").unwrap();
        assert_eq!(load_board(&store), Board::seed());
    }

    #[test]
    fn test_memory_round_trip() {
        let board = Board::seed()
            .add_column("Review", "#cce8e1")
            .unwrap()
            .add_task(4, "x1".into(), "Check", "Look it over")
            .unwrap();
        let mut store = MemoryStore::default();
        save_board(&mut store, &board).unwrap();
        assert_eq!(load_board(&store), board);
    }

    #[test]
    fn test_reads_browser_layout() {
        let raw = r##"[{"id":1,"title":"Todo","color":"#ffcbd7","tasks":[{"id":"a","title":"t","status":"Todo","description":"d"}]}]"##;
        let mut store = MemoryStore::default();
        store.set(BOARD_KEY, raw).unwrap();
        let board = load_board(&store);
        assert_eq!(board.titles(), vec!["Todo"]);
        assert_eq!(board.find_task("a").unwrap().1.description, "d");
    }

    #[test]
    fn test_file_store_slots() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("nested").join("board.json"));
        assert_eq!(store.get("cols").unwrap(), None);
        store.set("cols", "[1]").unwrap();
        store.set("other", "x").unwrap();
        assert_eq!(store.get("cols").unwrap().as_deref(), Some("[1]"));

        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_file_store_replaces_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.json");
        fs::write(&path, "garbage").unwrap();
        let mut store = FileStore::new(&path);
        assert!(store.get("cols").is_err());
        store.set("cols", "[]").unwrap();
        assert_eq!(store.get("cols").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persist_observer_writes_board() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("board.json");
        let board = Board::seed().delete_column("Done").unwrap();
        Persist::new(FileStore::new(&path))
            .board_changed(&board)
            .unwrap();
        assert_eq!(load_board(&FileStore::new(&path)), board);
    }

    #[test]
    fn test_persist_observer_returns_save_failure() {
        let err = Persist::new(ReadOnlyStore)
            .board_changed(&Board::seed())
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
