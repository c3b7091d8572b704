use crate::core::models::actor::Actor;
use crate::core::models::document::{Document, Fields};

/// A mutating lifecycle event on a tracked collection.
///
/// The kind of mutation is decided by the caller at the framework
/// boundary, where it is unambiguous — not inferred later by inspecting
/// flags on a generic payload.
#[derive(Debug)]
pub enum MutationEvent<'a> {
    /// A full-document save: creation or update of a loaded instance.
    Save(&'a Document),
    /// An update-by-query that never loads the full document.
    ///
    /// `baseline` is the prior state to diff against, supplied by the
    /// caller. In diff mode its absence fails the mutation; there is no
    /// silent fallback to an empty baseline.
    QueryUpdate {
        collection: &'a str,
        baseline: Option<&'a Fields>,
        /// The raw update specification. Its `$set` fragment, when
        /// present, is what full-snapshot mode records.
        spec: &'a Fields,
    },
    /// A delete-by-query. No prior document is loaded, so the record is
    /// synthesized from the delete condition and the acting identity.
    Delete {
        collection: &'a str,
        condition: &'a Fields,
        actor: &'a Actor,
    },
}

impl MutationEvent<'_> {
    /// The source collection this event targets.
    pub fn collection(&self) -> &str {
        match self {
            MutationEvent::Save(doc) => &doc.collection,
            MutationEvent::QueryUpdate { collection, .. } => collection,
            MutationEvent::Delete { collection, .. } => collection,
        }
    }
}
