//! Object store client for notebook deployment
//!
//! The stack ships an S3-compatible store (MinIO in the default stack).
//! Berth only needs a narrow surface: reachability, prefix listing,
//! upload and delete. The HTTP implementation speaks path-style S3 with
//! a blocking client; authentication is the stack's bucket policy, not
//! request signing.

use crate::core::config::ConfigStore;
use crate::core::error::{BerthError, BerthResult, ConfigError, StoreError};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Config name for the object store connection
pub const STORAGE_CONFIG: &str = "storage";

/// The `storage.yaml` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
  /// Store endpoint, e.g. `http://localhost:9000`
  pub url: String,

  /// Bucket notebooks deploy into
  #[serde(default = "default_bucket")]
  pub bucket: String,
}

fn default_bucket() -> String {
  "notebooks".to_string()
}

/// Narrow object-store surface consumed by deploys and self checks
pub trait ObjectStore {
  /// Probe that the store answers at all
  fn health(&self) -> BerthResult<()>;

  /// List object keys under a prefix, in listing order
  fn list(&self, prefix: &str) -> BerthResult<Vec<String>>;

  /// Upload one object
  fn put(&self, key: &str, bytes: &[u8]) -> BerthResult<()>;

  /// Delete one object
  fn delete(&self, key: &str) -> BerthResult<()>;
}

/// Path-style S3-compatible store over HTTP
pub struct HttpObjectStore {
  endpoint: String,
  bucket: String,
  client: Client,
}

impl HttpObjectStore {
  /// Create a client for an endpoint and bucket
  pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
    Self {
      endpoint: endpoint.into().trim_end_matches('/').to_string(),
      bucket: bucket.into(),
      client: Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new()),
    }
  }

  /// Create a client from the `storage` config
  pub fn from_config(store: &ConfigStore) -> BerthResult<Self> {
    let config = store.read_as::<StorageConfig>(STORAGE_CONFIG)?.ok_or_else(|| {
      BerthError::Config(ConfigError::NotFound {
        name: STORAGE_CONFIG.to_string(),
        root: store.root().to_path_buf(),
      })
    })?;
    Ok(Self::new(config.url, config.bucket))
  }

  /// The bucket this store deploys into
  pub fn bucket(&self) -> &str {
    &self.bucket
  }

  fn bucket_url(&self) -> String {
    format!("{}/{}", self.endpoint, self.bucket)
  }

  fn object_url(&self, key: &str) -> String {
    format!("{}/{}/{}", self.endpoint, self.bucket, key.trim_start_matches('/'))
  }

  fn unreachable(&self, err: reqwest::Error) -> BerthError {
    BerthError::Store(StoreError::Unreachable {
      endpoint: self.endpoint.clone(),
      reason: err.to_string(),
    })
  }
}

impl ObjectStore for HttpObjectStore {
  fn health(&self) -> BerthResult<()> {
    let response = self
      .client
      .get(self.bucket_url())
      .query(&[("list-type", "2"), ("max-keys", "1")])
      .send()
      .map_err(|e| self.unreachable(e))?;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(BerthError::Store(StoreError::RequestFailed {
        operation: "health".to_string(),
        key: self.bucket.clone(),
        status: response.status().as_u16(),
      }))
    }
  }

  fn list(&self, prefix: &str) -> BerthResult<Vec<String>> {
    let mut keys = Vec::new();
    let mut continuation: Option<String> = None;

    loop {
      let mut request = self
        .client
        .get(self.bucket_url())
        .query(&[("list-type", "2"), ("prefix", prefix)]);
      if let Some(token) = &continuation {
        request = request.query(&[("continuation-token", token.as_str())]);
      }

      let response = request.send().map_err(|e| self.unreachable(e))?;
      if !response.status().is_success() {
        return Err(BerthError::Store(StoreError::RequestFailed {
          operation: "list".to_string(),
          key: prefix.to_string(),
          status: response.status().as_u16(),
        }));
      }

      let body = response.text().map_err(|e| self.unreachable(e))?;
      let page = parse_list_page(&body)?;
      keys.extend(page.keys);

      match page.next_continuation {
        Some(token) => continuation = Some(token),
        None => break,
      }
    }

    Ok(keys)
  }

  fn put(&self, key: &str, bytes: &[u8]) -> BerthResult<()> {
    let response = self
      .client
      .put(self.object_url(key))
      .body(bytes.to_vec())
      .send()
      .map_err(|e| self.unreachable(e))?;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(BerthError::Store(StoreError::RequestFailed {
        operation: "put".to_string(),
        key: key.to_string(),
        status: response.status().as_u16(),
      }))
    }
  }

  fn delete(&self, key: &str) -> BerthResult<()> {
    let response = self.client.delete(self.object_url(key)).send().map_err(|e| self.unreachable(e))?;

    if response.status().is_success() {
      Ok(())
    } else {
      Err(BerthError::Store(StoreError::RequestFailed {
        operation: "delete".to_string(),
        key: key.to_string(),
        status: response.status().as_u16(),
      }))
    }
  }
}

/// One page of a ListObjectsV2 response
struct ListPage {
  keys: Vec<String>,
  next_continuation: Option<String>,
}

/// Pull object keys and the continuation token out of a ListObjectsV2 body
fn parse_list_page(xml: &str) -> BerthResult<ListPage> {
  let mut reader = Reader::from_str(xml);
  let mut keys = Vec::new();
  let mut next_continuation = None;
  let mut current: Option<&'static str> = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(e)) => {
        current = match e.name().as_ref() {
          b"Key" => Some("key"),
          b"NextContinuationToken" => Some("token"),
          _ => None,
        };
      }
      Ok(Event::Text(t)) => {
        let text = t
          .unescape()
          .map_err(|e| bad_list_response(e.to_string()))?
          .into_owned();
        match current {
          Some("key") => keys.push(text),
          Some("token") => next_continuation = Some(text),
          _ => {}
        }
      }
      Ok(Event::End(_)) => current = None,
      Ok(Event::Eof) => break,
      Err(e) => return Err(bad_list_response(e.to_string())),
      _ => {}
    }
  }

  Ok(ListPage { keys, next_continuation })
}

fn bad_list_response(reason: String) -> BerthError {
  BerthError::Store(StoreError::BadResponse {
    operation: "list".to_string(),
    reason,
  })
}
