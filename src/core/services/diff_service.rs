use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::core::models::diff::{DiffEntry, DiffKind, DiffOutcome, RecordData};
use crate::core::models::document::{ADDITIONAL_FIELD, Fields, ID_FIELD};

/// Per-field diff override.
///
/// Invoked with `(field, after, before)`. Returning `Some(value)` replaces
/// the default algorithm's output for that field with `value`, verbatim;
/// returning `None` skips the field entirely. The escape hatch for fields
/// with custom equality semantics (normalized strings, decimal money
/// types, ...).
pub type DiffOverride = Box<dyn Fn(&str, Option<&Value>, Option<&Value>) -> Option<Value> + Send + Sync>;

/// Computes structural diffs between two document states.
///
/// Overrides are dispatched through an explicit registry keyed by
/// top-level field name.
#[derive(Default)]
pub struct DiffService {
    overrides: HashMap<String, DiffOverride>,
}

impl DiffService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a diff override for one top-level field.
    pub fn register_override<F>(&mut self, field: impl Into<String>, f: F)
    where
        F: Fn(&str, Option<&Value>, Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.overrides.insert(field.into(), Box::new(f));
    }

    /// Compare two field maps and return their differences in traversal
    /// order.
    ///
    /// - Fields only in `after` are `New`
    /// - Fields only in `before` are `Deleted`
    /// - Fields in both with different scalar values are `Edited`
    /// - Nested maps recurse with an extended path
    /// - Arrays are compared positionally; each changed element is an
    ///   `Array` entry wrapping the index and the element-level kind
    ///
    /// Identical states produce an empty vector.
    pub fn diff(&self, before: &Fields, after: &Fields) -> Vec<DiffEntry> {
        let mut entries = Vec::new();
        self.diff_maps(before, after, &mut Vec::new(), &mut entries, true);
        entries
    }

    /// Full diff-mode payload for one mutation: strips the reserved
    /// metadata field from both sides, diffs, and forces the document's
    /// `_id` into the result so every record stays traceable even when
    /// `_id` itself did not change.
    pub fn diff_outcome(&self, before: &Fields, after: &Fields) -> DiffOutcome {
        let additional = after.get(ADDITIONAL_FIELD).cloned();

        let mut before = before.clone();
        let mut after = after.clone();
        before.remove(ADDITIONAL_FIELD);
        after.remove(ADDITIONAL_FIELD);

        let changes = self.diff(&before, &after);
        let id = after.get(ID_FIELD).cloned().unwrap_or(Value::Null);

        DiffOutcome {
            data: RecordData::Diff { id, changes },
            additional,
        }
    }

    /// Full-snapshot payload: the complete state, with the reserved
    /// metadata field pulled out into `additional`.
    pub fn snapshot_outcome(state: &Fields) -> DiffOutcome {
        let mut snapshot = state.clone();
        let additional = snapshot.remove(ADDITIONAL_FIELD);
        DiffOutcome {
            data: RecordData::Snapshot(snapshot),
            additional,
        }
    }

    fn diff_maps(
        &self,
        before: &Fields,
        after: &Fields,
        path: &mut Vec<String>,
        out: &mut Vec<DiffEntry>,
        top_level: bool,
    ) {
        // All keys from both sides, deduplicated and ordered via BTreeSet.
        let keys: BTreeSet<&str> = before
            .keys()
            .chain(after.keys())
            .map(String::as_str)
            .collect();

        for key in keys {
            let old = before.get(key);
            let new = after.get(key);

            // Overrides apply to top-level fields only.
            if top_level && let Some(custom) = self.overrides.get(key) {
                if let Some(value) = custom(key, new, old) {
                    path.push(key.to_string());
                    out.push(DiffEntry::new(path.clone(), DiffKind::Custom { value }));
                    path.pop();
                }
                continue;
            }

            match (old, new) {
                (None, Some(value)) => {
                    path.push(key.to_string());
                    out.push(DiffEntry::new(
                        path.clone(),
                        DiffKind::New {
                            value: value.clone(),
                        },
                    ));
                    path.pop();
                }
                (Some(old), None) => {
                    path.push(key.to_string());
                    out.push(DiffEntry::new(
                        path.clone(),
                        DiffKind::Deleted { old: old.clone() },
                    ));
                    path.pop();
                }
                (Some(old), Some(new)) if old != new => {
                    path.push(key.to_string());
                    self.diff_values(old, new, path, out);
                    path.pop();
                }
                _ => {} // Same value — no entry
            }
        }
    }

    /// Diff two present-on-both-sides values that are known to differ.
    fn diff_values(
        &self,
        old: &Value,
        new: &Value,
        path: &mut Vec<String>,
        out: &mut Vec<DiffEntry>,
    ) {
        match (old, new) {
            (Value::Object(before), Value::Object(after)) => {
                self.diff_maps(before, after, path, out, false);
            }
            (Value::Array(before), Value::Array(after)) => {
                for kind in Self::diff_arrays(before, after) {
                    out.push(DiffEntry::new(path.clone(), kind));
                }
            }
            _ => {
                out.push(DiffEntry::new(
                    path.clone(),
                    DiffKind::Edited {
                        old: old.clone(),
                        new: new.clone(),
                    },
                ));
            }
        }
    }

    /// Positional comparison of two arrays. One kind per changed index;
    /// a differing element is reported whole, nested arrays recurse.
    fn diff_arrays(before: &[Value], after: &[Value]) -> Vec<DiffKind> {
        let mut kinds = Vec::new();
        let len = before.len().max(after.len());

        for index in 0..len {
            match (before.get(index), after.get(index)) {
                (None, Some(value)) => kinds.push(DiffKind::Array {
                    index,
                    inner: Box::new(DiffKind::New {
                        value: value.clone(),
                    }),
                }),
                (Some(old), None) => kinds.push(DiffKind::Array {
                    index,
                    inner: Box::new(DiffKind::Deleted { old: old.clone() }),
                }),
                (Some(Value::Array(old)), Some(Value::Array(new))) if old != new => {
                    for inner in Self::diff_arrays(old, new) {
                        kinds.push(DiffKind::Array {
                            index,
                            inner: Box::new(inner),
                        });
                    }
                }
                (Some(old), Some(new)) if old != new => kinds.push(DiffKind::Array {
                    index,
                    inner: Box::new(DiffKind::Edited {
                        old: old.clone(),
                        new: new.clone(),
                    }),
                }),
                _ => {}
            }
        }

        kinds
    }
}
