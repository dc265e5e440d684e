//! Notebook deployment commands

use crate::core::config::ConfigStore;
use crate::core::error::BerthResult;
use crate::core::notebook::{self, NotebooksConfig};
use crate::core::store::{HttpObjectStore, ObjectStore};
use std::io::{self, Write};

/// Deploy notebooks from one repo or every configured repo
pub fn run_nb_deploy(repo: Option<String>) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let config = notebook::load_config(&config_store)?;
  let store = HttpObjectStore::from_config(&config_store)?;
  let start_dir = std::env::current_dir()?;

  let report = notebook::deploy(&config, &store, &start_dir, repo.as_deref())?;

  println!("\nUploaded {} notebooks to bucket '{}':", report.uploaded.len(), store.bucket());
  for key in &report.uploaded {
    println!("  {}", key);
  }
  if !report.failed.is_empty() {
    println!("\n{} notebooks failed:", report.failed.len());
    for (path, reason) in &report.failed {
      println!("  ❌ {}: {}", path.display(), reason);
    }
  }
  println!("\nDeployment complete!");
  Ok(())
}

/// List deployed notebooks, under one prefix or per configured repo
pub fn run_nb_ls(prefix: Option<String>) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let store = HttpObjectStore::from_config(&config_store)?;

  match prefix {
    Some(prefix) => {
      let keys = store.list(&prefix)?;
      println!("Files under prefix '{}' in bucket {}:", prefix, store.bucket());
      for key in keys {
        println!("  {}", key);
      }
    }
    None => {
      let config = notebook::load_config(&config_store)?;
      for repo in &config.repos {
        let keys = store.list(&repo.name)?;
        println!("Repo {} has {} files in bucket {}", repo.name, keys.len(), store.bucket());
        for key in keys {
          println!("  {}", key);
        }
      }
    }
  }
  Ok(())
}

/// Delete every deployed notebook under a prefix
pub fn run_nb_rm(prefix: &str, yes: bool) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let store = HttpObjectStore::from_config(&config_store)?;

  let keys = store.list(prefix)?;
  if keys.is_empty() {
    println!("Nothing deployed under prefix '{}'.", prefix);
    return Ok(());
  }

  println!("About to delete {} objects from bucket '{}':", keys.len(), store.bucket());
  for key in &keys {
    println!("  {}", key);
  }

  if !yes {
    print!("Proceed? [y/N]: ");
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    if !response.trim().eq_ignore_ascii_case("y") {
      println!("Aborted.");
      return Ok(());
    }
  }

  for key in &keys {
    store.delete(key)?;
    println!("Deleted {}", key);
  }
  Ok(())
}

/// Show the notebook deployment configuration
pub fn run_nb_cfg() -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let config: NotebooksConfig = notebook::load_config(&config_store)?;

  println!("Temp dir: {}", config.temp_dir.display());
  println!("Preserve temp copies: {}", config.preserve_temp);
  for repo in &config.repos {
    println!("Repo: {}", repo.name);
    for dir in &repo.directories {
      println!("  - {}", dir);
    }
  }
  Ok(())
}
