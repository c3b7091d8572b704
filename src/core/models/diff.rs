use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::models::document::Fields;

/// Classification of a single field difference between two states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffKind {
    /// Field present only in the new state.
    New { value: Value },
    /// Field present only in the old state.
    Deleted { old: Value },
    /// Field present in both states with different values.
    Edited { old: Value, new: Value },
    /// A positional change inside an ordered collection.
    Array { index: usize, inner: Box<DiffKind> },
    /// Verbatim result of a per-field diff override.
    Custom { value: Value },
}

/// One atomic change between two document states.
///
/// `path` locates the change: field names for nested maps, outermost
/// first. Positional indexes inside arrays live in the `Array` kind,
/// not in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: Vec<String>,
    #[serde(flatten)]
    pub kind: DiffKind,
}

impl DiffEntry {
    pub fn new(path: Vec<String>, kind: DiffKind) -> Self {
        Self { path, kind }
    }
}

/// The `data` payload of a history record.
///
/// Diff mode stores the ordered change set; full-snapshot mode stores the
/// complete post-mutation state. Either way the document's `_id` is
/// present: forced into the `Diff` variant, carried inside the map for
/// `Snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordData {
    Diff {
        /// The document's `_id`, recorded even when it did not change.
        id: Value,
        /// Changes in traversal order of the compared structures.
        changes: Vec<DiffEntry>,
    },
    Snapshot(Fields),
}

/// Output of the diff stage, handed to the record builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutcome {
    pub data: RecordData,
    /// Metadata pulled out of the reserved `history` field, if any.
    pub additional: Option<Value>,
}
