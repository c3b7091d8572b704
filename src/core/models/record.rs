use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::models::diff::RecordData;

/// What kind of mutation a history record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Remove,
}

/// One immutable entry in a collection's history log (JSON lines format).
///
/// Exactly one record is appended per successful mutation. Records are
/// never edited or deleted afterwards, except through the bulk
/// `clear_history` maintenance operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// Name of the source collection the mutation targeted.
    pub table: String,
    pub operation: Operation,
    /// Structural diff or full snapshot, mode-dependent. Always contains
    /// the document's `_id`.
    pub data: RecordData,
    /// Caller-supplied metadata (actor identity and the like), taken from
    /// the reserved `history` field of the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<Value>,
    /// SHA-256 over the canonical JSON of `data`, for after-the-fact
    /// integrity checks.
    pub state_hash: Option<String>,
    /// Assigned when the record is built, before the append.
    pub created_at: DateTime<Utc>,
}
