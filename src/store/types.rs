use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque backend record.
///
/// The backend owns the schema; this client passes records through as raw
/// JSON and never validates their shape. The only field it ever inspects
/// is the identifier field, and only for collection scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Value);

impl Record {
  /// String value of the given identifier field, if present.
  pub fn id(&self, id_field: &str) -> Option<&str> {
    self.0.get(id_field).and_then(Value::as_str)
  }
}
