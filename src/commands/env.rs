//! Environment export command

use crate::core::config::ConfigStore;
use crate::core::env::{render_exports, secret_env};
use crate::core::error::BerthResult;
use crate::core::remote::ConfigApi;

/// Print the assembled stack environment as shell export lines
pub fn run_env() -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let api = ConfigApi::from_env();
  let envs = secret_env(&config_store, api.base_url())?;

  for line in render_exports(&envs) {
    println!("{}", line);
  }
  Ok(())
}
