//! Notebook-based check results
//!
//! Not a checklist: this is the externally produced result stream the
//! selfcheck command appends after all checklists. It inspects what is
//! actually deployed in the object store, one result per configured
//! notebook directory, and degrades internally instead of erroring.

use super::report::CheckResult;
use crate::core::config::ConfigStore;
use crate::core::notebook::{self, NotebooksConfig};
use crate::core::store::{HttpObjectStore, ObjectStore};
use serde_json::json;

const AREA: &str = "notebooks";

/// Produce the notebook result stream
pub fn check_results(config_store: &ConfigStore) -> Vec<CheckResult> {
  let config = match config_store.read_as::<NotebooksConfig>(notebook::NOTEBOOKS_CONFIG) {
    Ok(Some(config)) => config,
    Ok(None) => {
      return vec![CheckResult::misconfigured("notebooks config missing, notebook checks skipped", None)];
    }
    Err(err) => {
      return vec![CheckResult::misconfigured(format!("notebooks config unreadable: {}", err), None)];
    }
  };

  let store = match HttpObjectStore::from_config(config_store) {
    Ok(store) => store,
    Err(err) => {
      return vec![CheckResult::misconfigured(format!("storage config unusable: {}", err), None)];
    }
  };

  results_from_store(&config, &store)
}

/// One result per repo directory: are notebooks deployed under its prefix?
pub fn results_from_store(config: &NotebooksConfig, store: &dyn ObjectStore) -> Vec<CheckResult> {
  let mut results = Vec::new();

  for repo in &config.repos {
    for dir in &repo.directories {
      let prefix = format!("{}/{}", repo.name, dir);
      match store.list(&prefix) {
        Ok(keys) => {
          let deployed = keys.iter().filter(|k| k.ends_with(".ipynb")).count();
          let result = if deployed > 0 {
            CheckResult::per_notebook(
              true,
              format!("{} notebooks deployed", deployed),
              AREA,
              Some(repo.name.clone()),
              dir.clone(),
            )
          } else {
            CheckResult::per_notebook(false, "no notebooks deployed", AREA, Some(repo.name.clone()), dir.clone())
          };
          results.push(result.with_context(json!({ "prefix": prefix, "deployed": deployed })));
        }
        Err(err) => {
          results.push(CheckResult::per_notebook(
            false,
            format!("listing failed: {}", err),
            AREA,
            Some(repo.name.clone()),
            dir.clone(),
          ));
        }
      }
    }
  }

  if results.is_empty() {
    results.push(CheckResult::all_good("no notebook repos configured"));
  }
  results
}
