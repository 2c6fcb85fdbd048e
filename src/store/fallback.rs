//! Two-step lookup strategy: direct fetch by id, then a full-collection
//! scan when the direct endpoint yields nothing.
//!
//! The strategy is a combinator over two injected request functions so the
//! policy can be unit-tested without HTTP. The direct request always runs
//! first; the collection request runs only if the direct one failed or
//! carried an empty payload. "Not found in either" is a successful `None`,
//! never an error — only transport/decode failures on the collection
//! request surface as errors.

use color_eyre::Result;
use std::future::Future;
use tracing::{debug, warn};

use super::types::Record;

/// First record whose identifier field string-equals `id`.
pub fn find_by_id(records: Vec<Record>, id_field: &str, id: &str) -> Option<Record> {
  records.into_iter().find(|r| r.id(id_field) == Some(id))
}

/// Resolve a record by id, falling back to a collection scan.
pub async fn lookup_with_fallback<D, DFut, C, CFut>(
  direct: D,
  collection: C,
  id_field: &str,
  id: &str,
) -> Result<Option<Record>>
where
  D: FnOnce() -> DFut,
  DFut: Future<Output = Result<Option<Record>>>,
  C: FnOnce() -> CFut,
  CFut: Future<Output = Result<Vec<Record>>>,
{
  match direct().await {
    Ok(Some(record)) => return Ok(Some(record)),
    Ok(None) => debug!(id, "direct lookup carried no payload, scanning collection"),
    Err(e) => warn!(id, error = %e, "direct lookup failed, scanning collection"),
  }

  let records = collection().await?;
  Ok(find_by_id(records, id_field, id))
}

#[cfg(test)]
mod tests {
  use super::*;
  use color_eyre::eyre::eyre;
  use serde_json::json;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;

  fn record(id: &str) -> Record {
    Record(json!({"_id": id, "name": format!("record {id}")}))
  }

  #[test]
  fn find_by_id_picks_first_exact_match() {
    let records = vec![record("a"), record("b"), record("b")];

    let found = find_by_id(records, "_id", "b").unwrap();
    assert_eq!(found.id("_id"), Some("b"));
  }

  #[test]
  fn find_by_id_requires_string_equality() {
    // A numeric 10 must not match the identifier "10".
    let records = vec![Record(json!({"_id": 10}))];

    assert!(find_by_id(records, "_id", "10").is_none());
  }

  #[tokio::test]
  async fn direct_hit_skips_the_collection() {
    let scans = Arc::new(AtomicU32::new(0));
    let scans_clone = scans.clone();

    let result = lookup_with_fallback(
      || async { Ok(Some(record("p-1"))) },
      move || {
        scans_clone.fetch_add(1, Ordering::SeqCst);
        async { Ok(vec![record("p-1")]) }
      },
      "_id",
      "p-1",
    )
    .await
    .unwrap();

    assert_eq!(result.unwrap().id("_id"), Some("p-1"));
    assert_eq!(scans.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn empty_direct_payload_falls_back_to_scan() {
    let result = lookup_with_fallback(
      || async { Ok(None) },
      || async { Ok(vec![record("a"), record("b")]) },
      "_id",
      "b",
    )
    .await
    .unwrap();

    assert_eq!(result.unwrap().id("_id"), Some("b"));
  }

  #[tokio::test]
  async fn direct_failure_falls_back_to_scan() {
    let result = lookup_with_fallback(
      || async { Err(eyre!("connection refused")) },
      || async { Ok(vec![record("b")]) },
      "_id",
      "b",
    )
    .await
    .unwrap();

    assert_eq!(result.unwrap().id("_id"), Some("b"));
  }

  #[tokio::test]
  async fn absent_from_both_is_success_none() {
    let result = lookup_with_fallback(
      || async { Ok(None) },
      || async { Ok(vec![record("a")]) },
      "_id",
      "missing",
    )
    .await
    .unwrap();

    assert!(result.is_none());
  }

  #[tokio::test]
  async fn collection_failure_is_an_error() {
    let result = lookup_with_fallback(
      || async { Ok(None) },
      || async { Err(eyre!("connection reset by peer")) },
      "_id",
      "b",
    )
    .await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("connection reset"));
  }
}
