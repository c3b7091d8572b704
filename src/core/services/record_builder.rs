use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::errors::{HistoryError, Result};
use crate::core::models::diff::{DiffOutcome, RecordData};
use crate::core::models::record::{HistoryRecord, Operation};

/// Assemble the immutable history record for one mutation.
///
/// Stamps `created_at` at build time and hashes the canonical JSON of
/// `data` so the record can be integrity-checked later. A missing payload
/// means the diff stage produced nothing usable — an implementation bug
/// that is rejected here rather than recorded as an empty-data entry.
pub fn build(
    table: &str,
    operation: Operation,
    payload: Option<DiffOutcome>,
) -> Result<HistoryRecord> {
    let DiffOutcome { data, additional } = payload.ok_or_else(|| HistoryError::MalformedPayload {
        detail: format!("diff stage produced no payload for '{table}'"),
    })?;

    let state_hash = hash_data(&data)?;

    Ok(HistoryRecord {
        id: Uuid::new_v4(),
        table: table.to_string(),
        operation,
        data,
        additional,
        state_hash: Some(state_hash),
        created_at: Utc::now(),
    })
}

fn hash_data(data: &RecordData) -> Result<String> {
    let canonical = serde_json::to_string(data).map_err(|e| HistoryError::MalformedPayload {
        detail: format!("unserializable record data: {e}"),
    })?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(format!("{digest:x}"))
}
