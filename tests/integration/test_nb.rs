//! Tests for the `nb` commands

use crate::helpers::*;
use anyhow::Result;

const MINIMAL_NOTEBOOK: &str = r#"{
  "cells": [
    { "cell_type": "code", "metadata": {}, "outputs": [], "source": "print('hi')" }
  ],
  "metadata": {},
  "nbformat": 4,
  "nbformat_minor": 5
}"#;

/// A root with a committed notebook repo and store/notebook configs
fn root_with_repo() -> Result<TestRoot> {
  let root = TestRoot::new()?;
  let repo = root.work.join("analytics");
  std::fs::create_dir_all(repo.join("reports"))?;
  std::fs::write(repo.join("reports/daily.ipynb"), MINIMAL_NOTEBOOK)?;
  git_init(&repo)?;
  git(&repo, &["add", "."])?;
  git(&repo, &["commit", "-m", "Add daily report"])?;

  root.write_config("storage", "url: http://127.0.0.1:1\nbucket: notebooks\n")?;
  let temp_dir = root.root.join("nb-temp");
  root.write_config(
    "notebooks",
    &format!(
      "temp_dir: {}\npreserve_temp: true\nrepos:\n  - name: analytics\n    directories: [reports]\n",
      temp_dir.display()
    ),
  )?;
  Ok(root)
}

#[test]
fn test_nb_cfg_shows_repos() -> Result<()> {
  let root = root_with_repo()?;

  let output = run_berth(&root, &["nb", "cfg"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("Repo: analytics"));
  assert!(out.contains("  - reports"));
  Ok(())
}

#[test]
fn test_nb_cfg_without_config_fails_with_help() -> Result<()> {
  let root = TestRoot::new()?;

  let output = run_berth(&root, &["nb", "cfg"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("notebooks"));
  Ok(())
}

#[test]
fn test_nb_deploy_stamps_even_when_store_is_down() -> Result<()> {
  let root = root_with_repo()?;

  let output = run_berth(&root, &["nb", "deploy"])?;
  // Upload failures are reported per notebook, not fatal.
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("notebooks failed"));
  assert!(out.contains("Deployment complete!"));

  // preserve_temp keeps the stamped copy: it carries the gitinfo cell.
  let stamped = std::fs::read_to_string(root.root.join("nb-temp/daily.ipynb"))?;
  let parsed: serde_json::Value = serde_json::from_str(&stamped)?;
  let first_cell = &parsed["cells"][0];
  assert_eq!(first_cell["cell_type"], "markdown");
  assert!(first_cell["metadata"]["tags"].as_array().unwrap().iter().any(|t| t == "gitinfo"));
  assert!(first_cell["source"].as_str().unwrap().contains("# Notebook: daily.ipynb"));
  Ok(())
}

#[test]
fn test_nb_deploy_unknown_repo_fails() -> Result<()> {
  let root = root_with_repo()?;

  let output = run_berth(&root, &["nb", "deploy", "--repo", "ghost"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("ghost"));
  Ok(())
}

#[test]
fn test_nb_ls_with_store_down_fails() -> Result<()> {
  let root = root_with_repo()?;

  let output = run_berth(&root, &["nb", "ls", "analytics"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("unreachable"));
  Ok(())
}

#[test]
fn test_nb_rm_requires_storage_config() -> Result<()> {
  let root = TestRoot::new()?;

  let output = run_berth(&root, &["nb", "rm", "analytics", "--yes"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("storage"));
  Ok(())
}
