//! Config inspection commands

use crate::core::config::ConfigStore;
use crate::core::error::BerthResult;
use crate::core::remote::{self, ConfigApi};

/// List available config names
pub fn run_cfg_ls(verbose: bool) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let names = config_store.list();

  if names.is_empty() {
    println!("No configs found under {}.", config_store.root().display());
    return Ok(());
  }
  for name in names {
    if verbose {
      println!("{}  ({})", name, config_store.file_name(&name).display());
    } else {
      println!("{}", name);
    }
  }
  Ok(())
}

/// Show one config, from the API server if available or from file
pub fn run_cfg_show(name: &str, json: bool) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let api = ConfigApi::from_env();
  let config = remote::get_config(&config_store, &api, name)?;

  if json {
    let value: serde_json::Value = serde_yaml::from_value(serde_yaml::Value::Mapping(config.clone()))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
  } else {
    print!("{}", serde_yaml::to_string(&config)?);
  }
  Ok(())
}

/// Delete one config file
pub fn run_cfg_rm(name: &str) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  if config_store.delete(name)? {
    println!("Deleted config '{}'.", name);
  } else {
    println!("Config '{}' not found under {}.", name, config_store.root().display());
  }
  Ok(())
}
