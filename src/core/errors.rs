/// All domain errors for Historian.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error(
        "No pre-image baseline for '{collection}'\n\n  \
         Diff mode requires a state captured at load time, and this document \
         was never captured.\n  \
         Call the engine's on_load() after every load of a tracked document, \
         or supply an explicit baseline on query-style updates."
    )]
    NoBaseline { collection: String },

    #[error(
        "Malformed history payload: {detail}\n\n  \
         The diff stage produced no usable data. This indicates a bug in the \
         caller or in a custom diff override, not a recoverable condition."
    )]
    MalformedPayload { detail: String },

    #[error("History append to '{collection}' failed: {detail}")]
    SinkWriteFailure { collection: String, detail: String },

    #[error(
        "Invalid history collection name '{name}'\n\n  \
         Names must be plain identifiers: no path separators, no leading dots."
    )]
    InvalidCollectionName { name: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HistoryError>;
