//! Stack and plugin resolution
//!
//! A stack is a named set of plugins defined in `stacks.yaml`; the
//! selected stack lives in `current.yaml`. Every fan-out operation (dc,
//! selfcheck, env assembly) resolves plugins through this module.

use crate::core::config::ConfigStore;
use crate::core::error::{BerthError, BerthResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Config name for the stack definitions
pub const STACKS_CONFIG: &str = "stacks";

/// Config name for the current stack selection
pub const CURRENT_CONFIG: &str = "current";

/// One stack definition out of `stacks.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
  /// Plugin directories making up the stack, in start order
  #[serde(default)]
  pub plugins: Option<Vec<String>>,

  /// Free-form description shown by `berth stack ls`
  #[serde(default)]
  pub description: Option<String>,
}

/// The whole `stacks.yaml` document: stack name to definition
pub type StacksDoc = BTreeMap<String, StackConfig>;

/// The `current.yaml` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStackDoc {
  /// Editing note kept in the file
  #[serde(default)]
  pub annotation: Option<String>,

  /// Selected stack name
  pub current_stack: String,
}

/// Load all stack definitions
pub fn load_stacks(store: &ConfigStore) -> BerthResult<StacksDoc> {
  Ok(store.read_as::<StacksDoc>(STACKS_CONFIG)?.unwrap_or_default())
}

/// List the configured stack names
pub fn stack_names(store: &ConfigStore) -> BerthResult<Vec<String>> {
  Ok(load_stacks(store)?.into_keys().collect())
}

/// Look up one stack's definition
pub fn stack_config(store: &ConfigStore, name: &str) -> BerthResult<Option<StackConfig>> {
  Ok(load_stacks(store)?.remove(name))
}

/// Get the current stack name, if one is selected
pub fn current_stack(store: &ConfigStore) -> BerthResult<Option<String>> {
  Ok(store.read_as::<CurrentStackDoc>(CURRENT_CONFIG)?.map(|doc| doc.current_stack))
}

/// Select the current stack
///
/// Unknown stack names are rejected with the list of known ones.
pub fn set_current_stack(store: &ConfigStore, name: &str) -> BerthResult<()> {
  let available = stack_names(store)?;
  if !available.iter().any(|s| s == name) {
    return Err(BerthError::Config(ConfigError::StackNotFound {
      name: name.to_string(),
      available,
    }));
  }

  let doc = CurrentStackDoc {
    annotation: Some("the current stack for berth, use `berth stack set` to change it, editing here is fine too".to_string()),
    current_stack: name.to_string(),
  };
  let value = serde_yaml::to_value(&doc)?;
  let serde_yaml::Value::Mapping(mapping) = value else {
    return Err(BerthError::message("Current stack document did not serialize to a mapping"));
  };
  store.write(CURRENT_CONFIG, &mapping)
}

/// Resolve the plugins to operate on
///
/// Resolves the current stack's plugin list; when `single` names one
/// plugin, the result is narrowed to it (and membership is enforced).
pub fn resolve_plugins(store: &ConfigStore, single: Option<&str>) -> BerthResult<Vec<String>> {
  let current = current_stack(store)?.ok_or(BerthError::Config(ConfigError::NoCurrentStack))?;

  let config = stack_config(store, &current)?.ok_or_else(|| {
    BerthError::Config(ConfigError::StackNotFound {
      name: current.clone(),
      available: stack_names(store).unwrap_or_default(),
    })
  })?;

  let plugins = config.plugins.ok_or_else(|| {
    BerthError::Config(ConfigError::MissingKey {
      config: STACKS_CONFIG.to_string(),
      key: format!("plugins (stack '{}')", current),
    })
  })?;

  match single {
    None => Ok(plugins),
    Some(plugin) => {
      if plugins.iter().any(|p| p == plugin) {
        Ok(vec![plugin.to_string()])
      } else {
        Err(BerthError::with_help(
          format!("Plugin '{}' not found in stack '{}'", plugin, current),
          format!("Plugins in this stack: {}", plugins.join(", ")),
        ))
      }
    }
  }
}
