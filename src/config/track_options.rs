/// Override for history-collection naming, given the source collection.
pub type CollectionNameFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Programmatic options for one tracked collection.
pub struct TrackOptions {
    /// `true` stores structural diffs against the load-time pre-image;
    /// `false` (the default) stores a full snapshot on every mutation.
    pub diff_only: bool,
    /// Custom history-collection naming. `None` uses the default
    /// `{source}_history` convention.
    pub collection_name: Option<CollectionNameFn>,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            diff_only: false,
            collection_name: None,
        }
    }
}

impl TrackOptions {
    /// Snapshot-mode options. Same as `Default`, spelled out.
    pub fn snapshots() -> Self {
        Self::default()
    }

    /// Diff-mode options.
    pub fn diffs() -> Self {
        Self {
            diff_only: true,
            collection_name: None,
        }
    }

    /// Set a custom naming function (builder pattern).
    pub fn with_collection_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.collection_name = Some(Box::new(f));
        self
    }
}
