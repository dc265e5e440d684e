//! Notebook stamping and deployment
//!
//! Notebooks are JSON documents. Before upload, each one gets a markdown
//! cell tagged `gitinfo` holding the revision it was deployed from; the
//! stamped copy is written under a temp dir, uploaded to the object
//! store, and cleaned up unless the config says otherwise.

use crate::core::config::ConfigStore;
use crate::core::error::{BerthError, BerthResult, ResultExt};
use crate::core::git::GitInfo;
use crate::core::store::ObjectStore;
use crate::ui::progress::UploadProgress;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Config name for notebook deployment
pub const NOTEBOOKS_CONFIG: &str = "notebooks";

/// Cell tag marking the revision stamp
pub const STAMP_TAG: &str = "gitinfo";

/// The `notebooks.yaml` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebooksConfig {
  /// Where stamped copies are written before upload
  pub temp_dir: PathBuf,

  /// Keep stamped copies after upload
  #[serde(default)]
  pub preserve_temp: bool,

  /// Repositories containing notebooks to deploy
  #[serde(default)]
  pub repos: Vec<RepoConfig>,
}

/// One notebook repository in the deployment config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
  /// Repository directory name, found relative to the working directory
  pub name: String,

  /// Notebook directories inside the repository
  #[serde(default)]
  pub directories: Vec<String>,
}

impl NotebooksConfig {
  /// Look up one repo's deployment config
  pub fn repo(&self, name: &str) -> Option<&RepoConfig> {
    self.repos.iter().find(|r| r.name == name)
  }
}

/// Load the notebook deployment config
pub fn load_config(store: &ConfigStore) -> BerthResult<NotebooksConfig> {
  store.read_as::<NotebooksConfig>(NOTEBOOKS_CONFIG)?.ok_or_else(|| {
    BerthError::with_help(
      format!("Config '{}' not found under {}", NOTEBOOKS_CONFIG, store.root().display()),
      "Notebook deployment needs a notebooks.yaml with temp_dir and repos.",
    )
  })
}

/// Find a directory in `start` or up to three parent directories
pub fn find_dir(start: &Path, dir_name: &str) -> BerthResult<PathBuf> {
  let mut looked_in = Vec::new();
  let mut base = start.to_path_buf();
  for _ in 0..4 {
    let candidate = base.join(dir_name);
    if candidate.exists() {
      return candidate
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", candidate.display()));
    }
    looked_in.push(candidate);
    base.push("..");
  }
  Err(BerthError::message(format!(
    "Directory '{}' not found, looked in:\n{}",
    dir_name,
    looked_in
      .iter()
      .map(|p| format!("  {}", p.display()))
      .collect::<Vec<_>>()
      .join("\n")
  )))
}

/// Format the revision stamp as markdown
pub fn format_stamp_md(info: &GitInfo, notebook_name: &str) -> String {
  let mut md = format!(
    "# Notebook: {}\n\n\
     > **Git Revision**: `{}` | **Branch**: `{}`\n\n\
     > **Commit Date**: {} | **Author**: {}\n\n\
     > **Deployed**: {}",
    notebook_name, info.revision, info.branch, info.commit_date, info.author, info.deployed
  );
  if let Some(url) = &info.url {
    md.push_str(&format!("\n\n> [{}]({})", url, url));
  }
  md
}

/// Find the index of the first cell carrying `tag`
pub fn find_cell_by_tag(notebook: &Value, tag: &str) -> Option<usize> {
  let cells = notebook.get("cells")?.as_array()?;
  cells.iter().position(|cell| {
    cell
      .get("metadata")
      .and_then(|m| m.get("tags"))
      .and_then(|t| t.as_array())
      .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(tag)))
  })
}

/// Stamp one notebook with revision info and write the copy to `output`
///
/// An existing `gitinfo` cell is updated in place; otherwise a fresh
/// markdown cell is inserted at the top.
pub fn stamp_notebook(input: &Path, output: &Path, info: &GitInfo) -> BerthResult<()> {
  let content =
    fs::read_to_string(input).with_context(|| format!("Failed to read notebook {}", input.display()))?;
  let mut notebook: Value =
    serde_json::from_str(&content).with_context(|| format!("Notebook {} is not valid JSON", input.display()))?;

  let name = input
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  let source = format_stamp_md(info, &name);

  let index = find_cell_by_tag(&notebook, STAMP_TAG);
  let cells = notebook
    .get_mut("cells")
    .and_then(|c| c.as_array_mut())
    .ok_or_else(|| BerthError::message(format!("Notebook {} has no cells array", input.display())))?;

  match index {
    Some(i) => {
      cells[i]["source"] = Value::String(source);
    }
    None => {
      cells.insert(
        0,
        json!({
          "cell_type": "markdown",
          "metadata": { "tags": [STAMP_TAG] },
          "source": source,
        }),
      );
    }
  }

  if let Some(parent) = output.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  let rendered = serde_json::to_string_pretty(&notebook)?;
  fs::write(output, rendered).with_context(|| format!("Failed to write {}", output.display()))?;
  Ok(())
}

/// What a deployment run did
#[derive(Debug, Default)]
pub struct DeployReport {
  /// Object keys uploaded
  pub uploaded: Vec<String>,
  /// Notebooks that could not be stamped or uploaded, with the reason
  pub failed: Vec<(PathBuf, String)>,
}

impl DeployReport {
  fn merge(&mut self, other: DeployReport) {
    self.uploaded.extend(other.uploaded);
    self.failed.extend(other.failed);
  }
}

/// Stamp and upload every notebook under one directory
pub fn deploy_dir(
  config: &NotebooksConfig,
  store: &dyn ObjectStore,
  info: &GitInfo,
  notebooks_dir: &Path,
  prefix: &str,
) -> BerthResult<DeployReport> {
  let mut report = DeployReport::default();
  let mut stamped: Vec<(PathBuf, String)> = Vec::new();

  for entry in WalkDir::new(notebooks_dir).into_iter().filter_map(|e| e.ok()) {
    let path = entry.path();
    if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("ipynb") {
      continue;
    }
    let rel_path = path
      .strip_prefix(notebooks_dir)
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|_| path.to_path_buf());
    let stamped_path = config.temp_dir.join(&rel_path);

    match stamp_notebook(path, &stamped_path, info) {
      Ok(()) => {
        let key = format!("{}/{}", prefix.trim_end_matches('/'), rel_path.display());
        stamped.push((stamped_path, key));
      }
      Err(err) => report.failed.push((path.to_path_buf(), err.to_string())),
    }
  }

  if stamped.is_empty() {
    return Ok(report);
  }

  let mut progress = UploadProgress::new(stamped.len(), format!("Uploading {} notebooks", stamped.len()));
  for (stamped_path, key) in stamped {
    let bytes =
      fs::read(&stamped_path).with_context(|| format!("Failed to read stamped copy {}", stamped_path.display()))?;
    match store.put(&key, &bytes) {
      Ok(()) => {
        report.uploaded.push(key);
        if !config.preserve_temp {
          let _ = fs::remove_file(&stamped_path);
        }
      }
      Err(err) => report.failed.push((stamped_path.clone(), err.to_string())),
    }
    progress.inc();
  }

  Ok(report)
}

/// Deploy every configured directory of one repository
pub fn deploy_repo(
  config: &NotebooksConfig,
  store: &dyn ObjectStore,
  start_dir: &Path,
  repo_name: &str,
) -> BerthResult<DeployReport> {
  let repo_dir = find_dir(start_dir, repo_name)?;
  let repo_cfg = config
    .repo(repo_name)
    .ok_or_else(|| BerthError::message(format!("Repo '{}' not present in notebooks config", repo_name)))?;

  let git = crate::core::git::GitRepo::open(&repo_dir)?;
  let info = git.info()?;
  println!("Stamping notebooks in repo {} with revision {}", repo_name, info.revision);

  let mut report = DeployReport::default();
  for dir in &repo_cfg.directories {
    let notebooks_dir = repo_dir.join(dir);
    if !notebooks_dir.exists() {
      report.failed.push((notebooks_dir, "notebooks directory not found".to_string()));
      continue;
    }
    let prefix = format!("{}/{}", repo_name, dir);
    report.merge(deploy_dir(config, store, &info, &notebooks_dir, &prefix)?);
  }
  Ok(report)
}

/// Deploy one repo or every configured repo
pub fn deploy(
  config: &NotebooksConfig,
  store: &dyn ObjectStore,
  start_dir: &Path,
  repo: Option<&str>,
) -> BerthResult<DeployReport> {
  let created_temp = !config.temp_dir.exists();
  if created_temp {
    fs::create_dir_all(&config.temp_dir)
      .with_context(|| format!("Failed to create temp dir {}", config.temp_dir.display()))?;
  }

  let mut report = DeployReport::default();
  match repo {
    Some(name) => report.merge(deploy_repo(config, store, start_dir, name)?),
    None => {
      for repo_cfg in &config.repos {
        report.merge(deploy_repo(config, store, start_dir, &repo_cfg.name)?);
      }
    }
  }

  if created_temp && !config.preserve_temp {
    let _ = fs::remove_dir_all(&config.temp_dir);
  }
  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_info() -> GitInfo {
    GitInfo {
      repo: PathBuf::from("/work/data"),
      branch: "main".to_string(),
      revision: "abc1234".to_string(),
      commit_date: "2026-08-01T12:00:00+00:00".to_string(),
      author: "Test User".to_string(),
      deployed: "2026-08-01T12:01:00+00:00".to_string(),
      url: Some("https://github.com/acme/data/commit/abc1234def".to_string()),
    }
  }

  fn sample_notebook() -> Value {
    json!({
      "cells": [
        { "cell_type": "code", "metadata": {}, "source": "print('hi')" }
      ],
      "metadata": {},
      "nbformat": 4,
      "nbformat_minor": 5
    })
  }

  #[test]
  fn test_format_stamp_md_contains_fields() {
    let md = format_stamp_md(&sample_info(), "daily.ipynb");
    assert!(md.contains("# Notebook: daily.ipynb"));
    assert!(md.contains("abc1234"));
    assert!(md.contains("Test User"));
    assert!(md.contains("https://github.com/acme/data/commit/abc1234def"));
  }

  #[test]
  fn test_format_stamp_md_without_remote() {
    let mut info = sample_info();
    info.url = None;
    let md = format_stamp_md(&info, "daily.ipynb");
    assert!(!md.contains("]("));
  }

  #[test]
  fn test_find_cell_by_tag() {
    let nb = json!({
      "cells": [
        { "cell_type": "code", "metadata": {}, "source": "" },
        { "cell_type": "markdown", "metadata": { "tags": ["gitinfo"] }, "source": "old" }
      ]
    });
    assert_eq!(find_cell_by_tag(&nb, STAMP_TAG), Some(1));
    assert_eq!(find_cell_by_tag(&nb, "other"), None);
  }

  #[test]
  fn test_stamp_inserts_cell_at_top() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nb.ipynb");
    let output = dir.path().join("out/nb.ipynb");
    fs::write(&input, serde_json::to_string(&sample_notebook()).unwrap()).unwrap();

    stamp_notebook(&input, &output, &sample_info()).unwrap();

    let stamped: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let cells = stamped["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0]["cell_type"], "markdown");
    assert_eq!(find_cell_by_tag(&stamped, STAMP_TAG), Some(0));
    assert!(cells[0]["source"].as_str().unwrap().contains("abc1234"));
  }

  #[test]
  fn test_stamp_updates_existing_cell() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nb.ipynb");
    let output = dir.path().join("nb_out.ipynb");

    let mut nb = sample_notebook();
    nb["cells"].as_array_mut().unwrap().push(json!({
      "cell_type": "markdown",
      "metadata": { "tags": [STAMP_TAG] },
      "source": "stale stamp"
    }));
    fs::write(&input, serde_json::to_string(&nb).unwrap()).unwrap();

    stamp_notebook(&input, &output, &sample_info()).unwrap();

    let stamped: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let cells = stamped["cells"].as_array().unwrap();
    // No new cell; the tagged one was rewritten in place.
    assert_eq!(cells.len(), 2);
    assert!(cells[1]["source"].as_str().unwrap().contains("abc1234"));
  }

  #[test]
  fn test_stamp_rejects_cell_free_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nb.ipynb");
    let output = dir.path().join("nb_out.ipynb");
    fs::write(&input, "{}").unwrap();

    assert!(stamp_notebook(&input, &output, &sample_info()).is_err());
  }

  #[test]
  fn test_find_dir_in_parent() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("repo/notebooks")).unwrap();
    let start = dir.path().join("repo/notebooks");

    let found = find_dir(&start, "repo").unwrap();
    assert!(found.ends_with("repo"));
  }

  #[test]
  fn test_find_dir_gives_up_after_four_levels() {
    let dir = tempfile::tempdir().unwrap();
    let err = find_dir(dir.path(), "definitely-absent").unwrap_err();
    assert!(err.to_string().contains("looked in"));
  }
}
