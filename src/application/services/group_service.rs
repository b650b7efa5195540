use crate::application::errors::StorageError;
use crate::domain::entities::{GroupTable, Handle, MentionGroup};
use crate::domain::traits::GroupStore;

/// Owns the group table for the lifetime of the process
///
/// The table is loaded once on `open` and the full table is written back
/// after every mutation, including mutations that changed nothing.
pub struct GroupService<S: GroupStore> {
    store: S,
    table: GroupTable,
}

impl<S: GroupStore> GroupService<S> {
    pub fn open(store: S) -> Self {
        let table = store.load();
        tracing::info!("Loaded mention groups for {} chats", table.len());
        Self { store, table }
    }

    /// Add `handle` to the chat's group and persist. Returns true if it was new.
    pub fn add_member(&mut self, chat_id: &str, handle: Handle) -> Result<bool, StorageError> {
        let added = self.table.add_member(chat_id, handle);
        self.store.save(&self.table)?;
        Ok(added)
    }

    /// Remove `handle` from the chat's group and persist. Returns true if it was present.
    pub fn remove_member(&mut self, chat_id: &str, handle: &Handle) -> Result<bool, StorageError> {
        let removed = self.table.remove_member(chat_id, handle);
        self.store.save(&self.table)?;
        Ok(removed)
    }

    pub fn members(&self, chat_id: &str) -> Option<&MentionGroup> {
        self.table.group(chat_id)
    }

    pub fn table(&self) -> &GroupTable {
        &self.table
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
