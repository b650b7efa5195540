//! File-based storage implementation

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::errors::StorageError;
use crate::domain::entities::GroupTable;
use crate::domain::traits::GroupStore;

pub mod memory;

pub use memory::MemoryStore;

/// JSON file-based store holding every chat's mention group in one document
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data directory if it does not exist yet
    pub fn init(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn encode(table: &GroupTable) -> Result<Vec<u8>, StorageError> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        table.serialize(&mut ser)?;
        Ok(buf)
    }
}

impl GroupStore for JsonFileStore {
    fn load(&self) -> GroupTable {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No group file at {:?}, starting empty", self.path);
                return GroupTable::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}, starting empty", self.path, e);
                return GroupTable::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed group file {:?}: {}", self.path, e);
            GroupTable::new()
        })
    }

    fn save(&self, table: &GroupTable) -> Result<(), StorageError> {
        let data = Self::encode(table)?;

        // Write to a sibling then rename so readers never see half a file
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved {} chats to {:?}", table.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Handle;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("user_groups.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for bad in ["{not json", "[\"alice\"]", "42", "{\"1\": {\"a\": 1}}"] {
            fs::write(store.path(), bad).unwrap();
            assert!(store.load().is_empty(), "loaded {:?}", bad);
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("alice"));
        table.add_member("1", Handle::new("bob"));
        table.add_member("-100200", Handle::new("carol"));

        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
        assert!(!dir.path().join("user_groups.tmp").exists());
    }

    #[test]
    fn test_save_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("alice"));
        store.save(&table).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "{\n    \"1\": [\n        \"alice\"\n    ]\n}");
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("alice"));
        store.save(&table).unwrap();

        table.remove_member("1", &Handle::new("alice"));
        store.save(&table).unwrap();

        let loaded = store.load();
        assert!(loaded.group("1").is_some_and(|g| g.is_empty()));
    }

    #[test]
    fn test_init_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/allo-code/user_groups.json"));
        store.init().unwrap();
        assert!(dir.path().join("nested/allo-code").is_dir());
    }
}
