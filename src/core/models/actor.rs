use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Identity of the caller performing a mutation.
///
/// Threaded explicitly through each call that needs it — never read from
/// process-wide state. Required on the delete path, where no document is
/// loaded and the record would otherwise carry no trace of who acted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub partner_id: String,
}

impl Actor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        partner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            partner_id: partner_id.into(),
        }
    }

    /// The `additional` metadata shape recorded on delete records.
    pub fn to_additional(&self) -> Value {
        json!({
            "user": { "id": self.id, "name": self.name },
            "partnerId": self.partner_id,
        })
    }
}
