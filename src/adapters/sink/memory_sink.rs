use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::errors::{HistoryError, Result};
use crate::core::models::record::HistoryRecord;
use crate::core::traits::sink::HistorySink;

/// In-memory history sink.
///
/// Backs tests and short-lived embeddings where no durable log is wanted.
/// One `Vec` per history collection, append order preserved.
#[derive(Default)]
pub struct MemoryHistorySink {
    collections: Mutex<HashMap<String, Vec<HistoryRecord>>>,
}

impl MemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<HistoryRecord>>>> {
        self.collections
            .lock()
            .map_err(|_| HistoryError::SinkWriteFailure {
                collection: String::new(),
                detail: "history store lock poisoned".into(),
            })
    }
}

impl HistorySink for MemoryHistorySink {
    fn append(&self, collection: &str, record: &HistoryRecord) -> Result<()> {
        self.locked()?
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn read_all(&self, collection: &str) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .locked()?
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn clear(&self, collection: &str) -> Result<()> {
        self.locked()?.remove(collection);
        Ok(())
    }
}
