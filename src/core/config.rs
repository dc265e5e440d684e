//! YAML configuration store under the berth root
//!
//! Configs are small flat YAML files in two folders under the berth root:
//! `secrets/` (credentials, wins on name collisions) and `config/`
//! (everything else). The root comes from `BERTH_ROOT_PATH`, defaulting
//! to `/opt/berth`.

use crate::core::error::{BerthError, BerthResult, ConfigError, ResultExt};
use serde::de::DeserializeOwned;
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the berth root folder
pub const ROOT_ENV: &str = "BERTH_ROOT_PATH";

/// Default berth root when `BERTH_ROOT_PATH` is unset
pub const DEFAULT_ROOT: &str = "/opt/berth";

/// Strip a `.yaml` or `.yml` extension from a config name
pub fn strip_yaml_ext(name: &str) -> &str {
  name
    .strip_suffix(".yaml")
    .or_else(|| name.strip_suffix(".yml"))
    .unwrap_or(name)
}

/// File-backed configuration store rooted at the berth root folder
#[derive(Debug, Clone)]
pub struct ConfigStore {
  root: PathBuf,
}

impl ConfigStore {
  /// Create a store over an explicit root (tests, probes)
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Create a store over the root named by `BERTH_ROOT_PATH`
  pub fn from_env() -> Self {
    let root = std::env::var(ROOT_ENV).unwrap_or_else(|_| DEFAULT_ROOT.to_string());
    Self { root: PathBuf::from(root) }
  }

  /// The berth root folder
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a config name to a file path, secrets folder first
  pub fn file_name(&self, name: &str) -> PathBuf {
    let name = strip_yaml_ext(name);
    let secret = self.root.join("secrets").join(format!("{}.yaml", name));
    if secret.is_file() {
      return secret;
    }
    self.root.join("config").join(format!("{}.yaml", name))
  }

  /// Read a config file as a YAML mapping
  ///
  /// Returns `None` when the file does not exist. An empty file reads as
  /// an empty mapping.
  pub fn read(&self, name: &str) -> BerthResult<Option<Mapping>> {
    if name.is_empty() {
      return Err(BerthError::Config(ConfigError::EmptyName));
    }
    let path = self.file_name(name);
    if !path.exists() {
      return Ok(None);
    }
    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    if content.trim().is_empty() {
      return Ok(Some(Mapping::new()));
    }
    let mapping: Mapping =
      serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;
    Ok(Some(mapping))
  }

  /// Read a config file and deserialize it into a typed document
  pub fn read_as<T: DeserializeOwned>(&self, name: &str) -> BerthResult<Option<T>> {
    match self.read(name)? {
      None => Ok(None),
      Some(mapping) => {
        let doc = serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))
          .with_context(|| format!("Config '{}' has an unexpected shape", name))?;
        Ok(Some(doc))
      }
    }
  }

  /// Read a config that must exist, whichever folder it lives in
  pub fn read_required(&self, name: &str) -> BerthResult<Mapping> {
    self.read(name)?.ok_or_else(|| {
      BerthError::Config(ConfigError::NotFound {
        name: name.to_string(),
        root: self.root.clone(),
      })
    })
  }

  /// Write a config file
  ///
  /// Takes an exclusive advisory lock on the file for the duration of the
  /// write so concurrent berth invocations cannot interleave. A `meta` key
  /// is stripped if present.
  pub fn write(&self, name: &str, data: &Mapping) -> BerthResult<()> {
    if name.is_empty() {
      return Err(BerthError::Config(ConfigError::EmptyName));
    }
    let path = self.file_name(name);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut data = data.clone();
    data.remove(&serde_yaml::Value::String("meta".to_string()));

    let file = fs::OpenOptions::new()
      .write(true)
      .create(true)
      .truncate(true)
      .open(&path)
      .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    let mut lock = fd_lock::RwLock::new(file);
    let guard = lock
      .write()
      .with_context(|| format!("Failed to lock {}", path.display()))?;
    serde_yaml::to_writer(&*guard, &data).with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
  }

  /// Delete a config file
  ///
  /// Returns true when a file was removed, false when it was not there.
  pub fn delete(&self, name: &str) -> BerthResult<bool> {
    let path = self.file_name(name);
    if path.exists() {
      fs::remove_file(&path).with_context(|| format!("Failed to delete {}", path.display()))?;
      Ok(true)
    } else {
      Ok(false)
    }
  }

  /// List all available config names, secrets included, extensions stripped
  pub fn list(&self) -> Vec<String> {
    let mut names: Vec<String> = list_files(&self.root.join("config"))
      .into_iter()
      .chain(list_files(&self.root.join("secrets")))
      .map(|f| strip_yaml_ext(&f).to_string())
      .collect();
    names.sort();
    names.dedup();
    names
  }

  /// List config names in the secrets folder only
  pub fn secret_names(&self) -> Vec<String> {
    let mut names: Vec<String> = list_files(&self.root.join("secrets"))
      .into_iter()
      .map(|f| strip_yaml_ext(&f).to_string())
      .collect();
    names.sort();
    names
  }
}

/// List plain file names in a directory, empty when it does not exist
fn list_files(path: &Path) -> Vec<String> {
  let Ok(entries) = fs::read_dir(path) else {
    return Vec::new();
  };
  entries
    .filter_map(|e| e.ok())
    .filter(|e| e.path().is_file())
    .filter_map(|e| e.file_name().into_string().ok())
    .collect()
}
