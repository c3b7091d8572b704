use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{HistoryError, Result};
use crate::core::models::record::HistoryRecord;
use crate::core::services::naming;
use crate::core::traits::sink::HistorySink;

/// History sink that appends records as JSON lines, one file per history
/// collection.
///
/// Each line is a self-contained JSON object representing one
/// `HistoryRecord`. The format supports efficient appends and
/// line-by-line streaming reads, and is inspectable with standard tools.
pub struct JsonHistorySink {
    data_dir: PathBuf,
}

impl JsonHistorySink {
    /// Create a sink that keeps `{collection}.jsonl` files under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn file_for(&self, collection: &str) -> Result<PathBuf> {
        naming::validate_collection_name(collection)?;
        Ok(self.data_dir.join(format!("{collection}.jsonl")))
    }

    fn write_failure(collection: &str, detail: impl std::fmt::Display) -> HistoryError {
        HistoryError::SinkWriteFailure {
            collection: collection.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl HistorySink for JsonHistorySink {
    fn append(&self, collection: &str, record: &HistoryRecord) -> Result<()> {
        let path = self.file_for(collection)?;
        let line = serde_json::to_string(record)
            .map_err(|e| Self::write_failure(collection, format!("serialize: {e}")))?;

        // Ensure the data directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Self::write_failure(collection, format!("open {}: {e}", path.display())))?;

        writeln!(file, "{line}").map_err(|e| Self::write_failure(collection, e))?;
        // Push the line to the OS before reporting success to the caller;
        // the triggering mutation commits on our word.
        file.flush().map_err(|e| Self::write_failure(collection, e))?;

        debug!(%collection, path = %path.display(), "history record appended");
        Ok(())
    }

    fn read_all(&self, collection: &str) -> Result<Vec<HistoryRecord>> {
        let path = self.file_for(collection)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: HistoryRecord =
                serde_json::from_str(trimmed).map_err(|e| HistoryError::MalformedPayload {
                    detail: format!(
                        "malformed record at {}:{}: {e}",
                        path.display(),
                        line_num + 1
                    ),
                })?;
            records.push(record);
        }

        Ok(records)
    }

    fn clear(&self, collection: &str) -> Result<()> {
        let path = self.file_for(collection)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Expose the resolved file path for a collection, mainly for tooling
/// and tests.
impl JsonHistorySink {
    pub fn path_for(&self, collection: &str) -> Result<PathBuf> {
        self.file_for(collection)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
