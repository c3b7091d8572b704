use serde_json::{Map, Value};

/// Field map of a schemaless document, as stored.
pub type Fields = Map<String, Value>;

/// Field holding the document's stable identifier.
pub const ID_FIELD: &str = "_id";

/// Reserved field for caller-supplied record metadata (actor identity,
/// request ids, ...). Extracted into `HistoryRecord.additional` and never
/// diffed or snapshotted itself.
pub const ADDITIONAL_FIELD: &str = "history";

/// A tracked document at the persistence-framework boundary.
///
/// The engine does not own the document's lifecycle — it only needs the
/// owning collection name, whether the instance has ever been persisted,
/// and a slot for the pre-image captured at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Name of the primary collection this document belongs to.
    pub collection: String,
    /// Current in-memory field values.
    pub fields: Fields,
    /// True until the instance is first persisted.
    pub is_new: bool,
    /// State captured right after load, used as the diff baseline.
    /// Populated by the engine's load hook when diff mode is on.
    pub pre_image: Option<Fields>,
}

impl Document {
    /// A freshly constructed document that has never been persisted.
    pub fn fresh(collection: impl Into<String>, fields: Fields) -> Self {
        Self {
            collection: collection.into(),
            fields,
            is_new: true,
            pre_image: None,
        }
    }

    /// A document loaded from storage.
    ///
    /// The pre-image starts empty; the engine's load hook fills it in.
    pub fn loaded(collection: impl Into<String>, fields: Fields) -> Self {
        Self {
            collection: collection.into(),
            fields,
            is_new: false,
            pre_image: None,
        }
    }

    /// The document's `_id` value, if present.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD)
    }
}
