use crate::config::track_options::TrackOptions;
use crate::core::errors::{HistoryError, Result};
use crate::core::models::document::{ADDITIONAL_FIELD, Document, Fields};

/// Capture a document's state right after load, before any mutation.
///
/// Only meaningful in diff mode; in snapshot mode nothing is retained.
/// The reserved metadata field is excluded — it belongs to the record
/// being built, not to the document's own state.
pub fn capture(options: &TrackOptions, doc: &mut Document) {
    if !options.diff_only {
        return;
    }
    let mut baseline = doc.fields.clone();
    baseline.remove(ADDITIONAL_FIELD);
    doc.pre_image = Some(baseline);
}

/// The baseline to diff a save against.
///
/// Fails with `NoBaseline` when no load-time capture happened. Callers
/// must route never-persisted documents to full-snapshot handling instead
/// of here; a fresh document legitimately has no baseline.
pub fn prior_state(doc: &Document) -> Result<&Fields> {
    doc.pre_image.as_ref().ok_or_else(|| HistoryError::NoBaseline {
        collection: doc.collection.clone(),
    })
}
