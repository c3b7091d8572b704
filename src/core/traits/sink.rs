use crate::core::errors::Result;
use crate::core::models::record::HistoryRecord;

/// Port for the append-only history log storage.
///
/// `collection` is the already-resolved history-collection name. Appends
/// must be atomic at the storage layer; the engine adds no locking of its
/// own. An `Err` from `append` blocks the triggering mutation — adapters
/// must not swallow write failures.
pub trait HistorySink: Send + Sync {
    /// Append one record to a history collection.
    fn append(&self, collection: &str, record: &HistoryRecord) -> Result<()>;

    /// Read a history collection in append order.
    fn read_all(&self, collection: &str) -> Result<Vec<HistoryRecord>>;

    /// Delete every record in a history collection. Maintenance use only.
    fn clear(&self, collection: &str) -> Result<()>;
}
