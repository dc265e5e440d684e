//! Object store reachability checks

use super::check::CheckList;
use super::report::CheckResult;
use crate::core::store::{HttpObjectStore, ObjectStore, StorageConfig};
use serde_json::json;
use std::sync::Arc;

/// Build the storage checklist
///
/// `config` is `None` when the `storage` config is absent; both checks
/// then report themselves as misconfigured.
pub fn checks(config: Option<StorageConfig>) -> CheckList {
  let mut list = CheckList::new("storage");

  let store = Arc::new(config.map(|c| HttpObjectStore::new(c.url, c.bucket)));

  let health_store = Arc::clone(&store);
  list.add("Store reachable", "The object store answers", move || {
    let Some(store) = health_store.as_ref() else {
      return Ok(CheckResult::misconfigured("storage config missing, cannot probe the store", None).into());
    };
    store.health()?;
    Ok(CheckResult::pass("Object store answers").into())
  });

  list.add("Notebook bucket", "The notebook bucket is listable", move || {
    let Some(store) = store.as_ref() else {
      return Ok(CheckResult::misconfigured("storage config missing, cannot list the bucket", None).into());
    };
    let keys = store.list("")?;
    Ok(
      CheckResult::pass(format!("bucket '{}' listable ({} objects)", store.bucket(), keys.len()))
        .with_context(json!({ "bucket": store.bucket(), "objects": keys.len() }))
        .into(),
    )
  });

  list
}
