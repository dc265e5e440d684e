//! Self-check command
//!
//! Runs a fixed ordered set of checklists plus the notebook result
//! stream and prints one line per result. The command reports, it does
//! not gate: the exit status is success regardless of what the lines
//! say, and callers read the symbols.

use crate::core::config::ConfigStore;
use crate::core::error::BerthResult;
use crate::core::remote::ConfigApi;
use crate::core::stack;
use crate::core::store::{StorageConfig, STORAGE_CONFIG};
use crate::selfcheck::{dirs, docker, network, notebooks, storage, CheckList, CheckResult};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The `network.yaml` document: named service endpoints to probe
#[derive(Debug, Default, Deserialize)]
struct NetworkConfig {
  #[serde(default)]
  endpoints: BTreeMap<String, String>,
}

/// Run all self checks
pub fn run_selfcheck(json: bool) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let api = ConfigApi::from_env();
  let base_dir = std::env::current_dir()?;

  // Probes get their configuration here, once; a failed resolution is
  // itself a reportable condition, not an abort.
  let plugins = stack::resolve_plugins(&config_store, None).ok();
  let endpoints: network::Endpoints = config_store
    .read_as::<NetworkConfig>("network")
    .ok()
    .flatten()
    .map(|n| n.endpoints.into_iter().collect())
    .unwrap_or_default();
  let storage_config = config_store.read_as::<StorageConfig>(STORAGE_CONFIG).ok().flatten();

  let mut checklists: Vec<CheckList> = vec![
    docker::checks(base_dir.clone(), plugins.clone()),
    dirs::checks(config_store.root().to_path_buf(), base_dir, plugins),
    network::checks(api.base_url().to_string(), endpoints),
    storage::checks(storage_config),
  ];

  let results = run_checklists(&mut checklists, notebooks::check_results(&config_store));

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    for result in &results {
      println!("{}", result.render());
    }
  }

  Ok(())
}

/// Execute checklists in declared order and collect every result
///
/// An error escaping a whole checklist (its setup stage) degrades to one
/// exception result and the remaining checklists still run. The external
/// stream is appended after all checklists.
pub fn run_checklists(checklists: &mut [CheckList], external: Vec<CheckResult>) -> Vec<CheckResult> {
  let mut results = Vec::new();
  for checklist in checklists.iter_mut() {
    match checklist.execute() {
      Ok(()) => results.extend(checklist.results()),
      Err(err) => results.push(CheckResult::exception("A checklist execution raised an exception.", &err)),
    }
  }
  results.extend(external);
  results
}
