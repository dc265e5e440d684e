//! Configuration API fallback
//!
//! A small HTTP API can serve the same named configs as the file store.
//! Reads prefer the API when it is reachable and quietly fall back to the
//! files; writes always go to the files.

use crate::core::config::ConfigStore;
use crate::core::error::{BerthError, BerthResult, ConfigError, ResultExt};
use reqwest::blocking::Client;
use serde_yaml::Mapping;
use std::time::Duration;

/// Environment variable naming the config API base URL
pub const CONFIG_URL_ENV: &str = "BERTH_CONFIG_URL";

/// Default config API base URL inside the stack network
pub const DEFAULT_CONFIG_URL: &str = "http://berth-config:8005/api/configs";

/// Client for the configuration HTTP API
pub struct ConfigApi {
  base_url: String,
  client: Client,
}

impl ConfigApi {
  /// Create a client for an explicit base URL
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      client: Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap_or_else(|_| Client::new()),
    }
  }

  /// Create a client for the URL named by `BERTH_CONFIG_URL`
  pub fn from_env() -> Self {
    let url = std::env::var(CONFIG_URL_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_URL.to_string());
    Self::new(url)
  }

  /// The API base URL
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Probe whether the API answers at all
  ///
  /// Any HTTP response counts as available; only transport failures do not.
  pub fn is_available(&self) -> bool {
    self.client.get(&self.base_url).send().is_ok()
  }

  /// Fetch a named config from the API as a mapping
  pub fn get_config(&self, name: &str) -> BerthResult<Mapping> {
    if name.is_empty() {
      return Err(BerthError::Config(ConfigError::EmptyName));
    }
    let url = format!("{}/{}", self.base_url, name);
    let response = self
      .client
      .get(&url)
      .send()
      .with_context(|| format!("Failed to reach config API at {}", url))?;
    if !response.status().is_success() {
      return Err(BerthError::message(format!(
        "Config API returned HTTP {} for '{}'",
        response.status().as_u16(),
        name
      )));
    }
    let mapping: Mapping = response
      .json()
      .with_context(|| format!("Config API returned unusable JSON for '{}'", name))?;
    Ok(mapping)
  }
}

/// Get a config, from the API server if available or from file otherwise
pub fn get_config(store: &ConfigStore, api: &ConfigApi, name: &str) -> BerthResult<Mapping> {
  if name.is_empty() {
    return Err(BerthError::Config(ConfigError::EmptyName));
  }
  if api.is_available() {
    return api.get_config(name);
  }
  store.read_required(name)
}
