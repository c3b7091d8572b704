use serde_json::Value;
use tracing::{debug, error};

use crate::config::track_options::TrackOptions;
use crate::core::errors::{HistoryError, Result};
use crate::core::models::actor::Actor;
use crate::core::models::diff::{DiffEntry, DiffKind, DiffOutcome, RecordData};
use crate::core::models::document::{Document, Fields, ID_FIELD};
use crate::core::models::mutation::MutationEvent;
use crate::core::models::record::HistoryRecord;
use crate::core::services::diff_service::DiffService;
use crate::core::services::{classifier, naming, pre_image, record_builder};
use crate::core::traits::sink::HistorySink;

/// Key of the update fragment recorded preferentially on query updates.
const SET_FRAGMENT: &str = "$set";

/// The change-capture engine for one tracked collection family.
///
/// Interposed as middleware on each mutating call of the surrounding
/// persistence framework. Every entry point runs the full
/// classify → diff → build → append sequence before returning, and the
/// caller must not commit its primary mutation unless the call returned
/// `Ok` — history capture is fail-closed.
pub struct HistoryEngine<S: HistorySink> {
    sink: S,
    options: TrackOptions,
    diff: DiffService,
}

impl<S: HistorySink> HistoryEngine<S> {
    pub fn new(sink: S, options: TrackOptions) -> Self {
        Self {
            sink,
            options,
            diff: DiffService::new(),
        }
    }

    /// Register a per-field diff override (builder pattern).
    pub fn with_override<F>(mut self, field: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, Option<&Value>, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.diff.register_override(field, f);
        self
    }

    /// Post-load hook: capture the pre-image while the document is still
    /// unmutated. Required before any diff-mode save of this instance.
    pub fn on_load(&self, doc: &mut Document) {
        pre_image::capture(&self.options, doc);
    }

    /// Save-path hook (create or update of a full document instance).
    pub fn on_save(&self, doc: &Document) -> Result<()> {
        self.record(&MutationEvent::Save(doc))
    }

    /// Update-by-query hook. `baseline` is the prior state to diff
    /// against; diff mode fails without one.
    pub fn on_query_update(
        &self,
        collection: &str,
        baseline: Option<&Fields>,
        spec: &Fields,
    ) -> Result<()> {
        self.record(&MutationEvent::QueryUpdate {
            collection,
            baseline,
            spec,
        })
    }

    /// Delete-by-query hook. No document is loaded on this path, so the
    /// acting identity is taken explicitly.
    pub fn on_delete(&self, collection: &str, condition: &Fields, actor: &Actor) -> Result<()> {
        self.record(&MutationEvent::Delete {
            collection,
            condition,
            actor,
        })
    }

    /// Record one mutating lifecycle event.
    ///
    /// An `Err` here means no history record was appended; the triggering
    /// mutation must not proceed.
    pub fn record(&self, event: &MutationEvent) -> Result<()> {
        let operation = classifier::classify(event);
        let payload = self.payload_for(event)?;
        let record = record_builder::build(event.collection(), operation, payload)?;
        self.append(event.collection(), &record)
    }

    /// A handle bound to one source collection's history log, for ad-hoc
    /// querying and maintenance.
    pub fn history_log(&self, source: &str) -> HistoryLog<'_, S> {
        HistoryLog {
            sink: &self.sink,
            collection: self.resolve(source),
        }
    }

    /// Delete every record in one source collection's history log.
    pub fn clear_history(&self, source: &str) -> Result<()> {
        self.sink.clear(&self.resolve(source))
    }

    fn resolve(&self, source: &str) -> String {
        naming::history_collection_name(source, self.options.collection_name.as_ref())
    }

    fn append(&self, source: &str, record: &HistoryRecord) -> Result<()> {
        let collection = self.resolve(source);
        debug!(%collection, operation = ?record.operation, "appending history record");
        self.sink.append(&collection, record).inspect_err(|e| {
            error!(%collection, "history append failed, blocking mutation: {e}");
        })
    }

    /// The mode-dependent `data` payload for one event.
    fn payload_for(&self, event: &MutationEvent) -> Result<Option<DiffOutcome>> {
        match event {
            MutationEvent::Save(doc) => {
                // A never-persisted instance has no pre-image by
                // construction; creates always record a full snapshot.
                if self.options.diff_only && !doc.is_new {
                    let baseline = pre_image::prior_state(doc)?;
                    Ok(Some(self.diff.diff_outcome(baseline, &doc.fields)))
                } else {
                    Ok(Some(DiffService::snapshot_outcome(&doc.fields)))
                }
            }
            MutationEvent::QueryUpdate {
                collection,
                baseline,
                spec,
            } => {
                let payload = spec
                    .get(SET_FRAGMENT)
                    .and_then(Value::as_object)
                    .unwrap_or(*spec);
                if self.options.diff_only {
                    let baseline = baseline.ok_or_else(|| HistoryError::NoBaseline {
                        collection: collection.to_string(),
                    })?;
                    Ok(Some(self.diff.diff_outcome(baseline, payload)))
                } else {
                    Ok(Some(DiffService::snapshot_outcome(payload)))
                }
            }
            MutationEvent::Delete {
                condition, actor, ..
            } => {
                let id = condition.get(ID_FIELD).cloned().unwrap_or(Value::Null);
                Ok(Some(DiffOutcome {
                    data: RecordData::Diff {
                        id: id.clone(),
                        changes: vec![DiffEntry::new(
                            vec![ID_FIELD.to_string()],
                            DiffKind::Deleted { old: id },
                        )],
                    },
                    additional: Some(actor.to_additional()),
                }))
            }
        }
    }
}

/// A handle to one resolved history collection.
pub struct HistoryLog<'a, S: HistorySink> {
    sink: &'a S,
    collection: String,
}

impl<S: HistorySink> HistoryLog<'_, S> {
    /// The resolved history-collection name this handle is bound to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// All records, oldest first.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        self.sink.read_all(&self.collection)
    }

    /// Delete all records. Maintenance use only.
    pub fn clear(&self) -> Result<()> {
        self.sink.clear(&self.collection)
    }
}
