use crate::application::errors::StorageError;
use crate::domain::entities::GroupTable;

/// GroupStore trait - durable home of the group table
///
/// Both calls deal in the whole table; there are no partial writes.
pub trait GroupStore: Send + Sync {
    /// Read the persisted table. Missing or malformed data yields an empty table.
    fn load(&self) -> GroupTable;

    /// Overwrite the persisted table with `table`
    fn save(&self, table: &GroupTable) -> Result<(), StorageError>;
}
