use crate::config::track_options::CollectionNameFn;
use crate::core::errors::{HistoryError, Result};

/// Suffix appended to a source collection's name by default.
pub const HISTORY_SUFFIX: &str = "_history";

/// Resolve the history-collection name for a source collection.
///
/// Deterministic: the default convention suffixes the source name, and a
/// custom naming function replaces the convention wholesale.
pub fn history_collection_name(source: &str, custom: Option<&CollectionNameFn>) -> String {
    match custom {
        Some(f) => f(source),
        None => format!("{source}{HISTORY_SUFFIX}"),
    }
}

/// Reject collection names that could escape a sink's data directory or
/// hide files. File-backed sinks derive filenames from these.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..");
    if invalid {
        return Err(HistoryError::InvalidCollectionName { name: name.into() });
    }
    Ok(())
}
