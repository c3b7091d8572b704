use serde::Deserialize;
use std::path::Path;

use crate::config::track_options::TrackOptions;
use crate::core::errors::{HistoryError, Result};
use crate::core::services::naming;

/// Top-level configuration read from `history.toml`.
///
/// Everything here is also reachable programmatically through
/// [`TrackOptions`]; the file form exists for deployments that wire the
/// engine up from configuration rather than code.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub history: HistorySection,
}

/// The `[history]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySection {
    /// Store structural diffs instead of full snapshots.
    #[serde(default)]
    pub diff_only: bool,
    /// Suffix appended to source collection names. Defaults to `_history`.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Data directory for the JSONL sink, when that adapter is used.
    pub data_dir: Option<String>,
}

fn default_suffix() -> String {
    naming::HISTORY_SUFFIX.to_string()
}

impl HistoryConfig {
    /// Load the configuration from `{dir}/history.toml`.
    ///
    /// After parsing, validates the suffix so a compromised config file
    /// cannot steer file-backed sinks outside their data directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join("history.toml");
        if !config_path.exists() {
            return Err(HistoryError::InvalidConfig {
                detail: format!("history.toml not found in {}", dir.display()),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Parse a configuration document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| HistoryError::InvalidConfig {
            detail: format!("failed to parse history.toml: {e}"),
        })?;

        // A name built with this suffix must stay a plain identifier.
        naming::validate_collection_name(&format!("x{}", config.history.suffix)).map_err(|_| {
            HistoryError::InvalidConfig {
                detail: format!("invalid history suffix '{}'", config.history.suffix),
            }
        })?;

        Ok(config)
    }

    /// Bridge the file configuration to programmatic options.
    pub fn track_options(&self) -> TrackOptions {
        let mut options = if self.history.diff_only {
            TrackOptions::diffs()
        } else {
            TrackOptions::snapshots()
        };
        if self.history.suffix != naming::HISTORY_SUFFIX {
            let suffix = self.history.suffix.clone();
            options = options.with_collection_name(move |source| format!("{source}{suffix}"));
        }
        options
    }
}
