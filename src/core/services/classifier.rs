use crate::core::models::mutation::MutationEvent;
use crate::core::models::record::Operation;

/// Classify a mutating lifecycle event.
///
/// Save-path events are creations exactly when the instance has never
/// been persisted; query-style updates are always updates; deletes are
/// always removes.
pub fn classify(event: &MutationEvent) -> Operation {
    match event {
        MutationEvent::Save(doc) if doc.is_new => Operation::Create,
        MutationEvent::Save(_) => Operation::Update,
        MutationEvent::QueryUpdate { .. } => Operation::Update,
        MutationEvent::Delete { .. } => Operation::Remove,
    }
}
