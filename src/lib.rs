//! Append-only change history for document stores.
//!
//! Historian interposes on the mutating lifecycle of a persisted-document
//! framework and records one immutable [`HistoryRecord`] per create,
//! update, or delete — either a structural diff against the document's
//! load-time pre-image or a full snapshot of the new state. Capture is
//! fail-closed: when a record cannot be built and appended, the engine
//! returns an error and the triggering mutation must not commit.
//!
//! ```
//! use historian::{Document, HistoryEngine, MemoryHistorySink, TrackOptions};
//! use serde_json::json;
//!
//! let engine = HistoryEngine::new(MemoryHistorySink::new(), TrackOptions::diffs());
//!
//! let fields = json!({"_id": 1, "name": "ada"}).as_object().cloned().unwrap();
//! let mut doc = Document::loaded("accounts", fields);
//! engine.on_load(&mut doc); // capture the pre-image
//!
//! doc.fields.insert("name".into(), json!("lovelace"));
//! engine.on_save(&doc).unwrap(); // one update record appended
//!
//! assert_eq!(engine.history_log("accounts").read_all().unwrap().len(), 1);
//! ```

mod adapters;
mod config;
mod core;

pub use crate::adapters::sink::json_sink::JsonHistorySink;
pub use crate::adapters::sink::memory_sink::MemoryHistorySink;
pub use crate::config::history_config::{HistoryConfig, HistorySection};
pub use crate::config::track_options::{CollectionNameFn, TrackOptions};
pub use crate::core::errors::{HistoryError, Result};
pub use crate::core::models::actor::Actor;
pub use crate::core::models::diff::{DiffEntry, DiffKind, DiffOutcome, RecordData};
pub use crate::core::models::document::{ADDITIONAL_FIELD, Document, Fields, ID_FIELD};
pub use crate::core::models::mutation::MutationEvent;
pub use crate::core::models::record::{HistoryRecord, Operation};
pub use crate::core::services::diff_service::{DiffOverride, DiffService};
pub use crate::core::services::engine::{HistoryEngine, HistoryLog};
pub use crate::core::services::naming::{HISTORY_SUFFIX, history_collection_name};
pub use crate::core::traits::sink::HistorySink;
