//! In-memory store, nothing touches the disk

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::GroupTable;
use crate::domain::traits::GroupStore;

#[derive(Default)]
pub struct MemoryStore {
    table: Mutex<GroupTable>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: GroupTable) -> Self {
        Self {
            table: Mutex::new(table),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl GroupStore for MemoryStore {
    fn load(&self) -> GroupTable {
        self.table
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn save(&self, table: &GroupTable) -> Result<(), StorageError> {
        let mut stored = self.table.lock().map_err(|_| StorageError::LockPoisoned)?;
        *stored = table.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
