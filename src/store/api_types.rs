//! Serde-deserializable envelopes matching the storefront API responses.
//!
//! Both endpoint shapes wrap their payload in a `data` field. Parsing is
//! lenient: a missing or null `data` is an empty payload, not an error,
//! and unknown top-level fields are ignored.

use serde::Deserialize;

use super::types::Record;

/// Response of `GET {base}/{resource}/view/{id}`: `{ "data": <record> }`
#[derive(Debug, Deserialize)]
pub struct ApiRecordResponse {
  #[serde(default)]
  pub data: Option<Record>,
}

/// Response of `GET {base}/{resource}`: `{ "data": [<record>, ...] }`
#[derive(Debug, Deserialize)]
pub struct ApiCollectionResponse {
  #[serde(default)]
  pub data: Vec<Record>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn record_response_with_payload() {
    let body: ApiRecordResponse =
      serde_json::from_value(json!({"data": {"_id": "p-1", "title": "Desk"}})).unwrap();

    let record = body.data.unwrap();
    assert_eq!(record.id("_id"), Some("p-1"));
  }

  #[test]
  fn null_or_missing_data_is_empty_payload() {
    let null_body: ApiRecordResponse = serde_json::from_value(json!({"data": null})).unwrap();
    let missing_body: ApiRecordResponse = serde_json::from_value(json!({})).unwrap();

    assert!(null_body.data.is_none());
    assert!(missing_body.data.is_none());
  }

  #[test]
  fn collection_response_defaults_to_empty_list() {
    let body: ApiCollectionResponse =
      serde_json::from_value(json!({"message": "ok"})).unwrap();

    assert!(body.data.is_empty());
  }

  #[test]
  fn collection_records_stay_opaque() {
    let body: ApiCollectionResponse = serde_json::from_value(json!({
      "data": [
        {"_id": "a", "nested": {"deep": [1, 2, 3]}},
        {"_id": "b"}
      ]
    }))
    .unwrap();

    assert_eq!(body.data.len(), 2);
    assert_eq!(body.data[0].id("_id"), Some("a"));
    assert_eq!(body.data[0].0["nested"]["deep"][2], json!(3));
  }
}
