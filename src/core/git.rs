//! Git metadata via the system git binary
//!
//! Notebook stamps carry the revision they were deployed from. All data
//! comes from git plumbing commands run with an isolated environment, one
//! subprocess per query.

use crate::core::error::{BerthError, BerthResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Revision information embedded into deployed notebooks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitInfo {
  /// Working tree root
  pub repo: PathBuf,
  /// Branch name, or "HEAD" when detached
  pub branch: String,
  /// Short commit hash
  pub revision: String,
  /// Commit date, ISO 8601
  pub commit_date: String,
  /// Commit author name
  pub author: String,
  /// Deployment timestamp, ISO 8601 UTC
  pub deployed: String,
  /// Link to the commit on the remote, when a remote exists
  pub url: Option<String>,
}

/// A git repository addressed through the system git binary
pub struct GitRepo {
  work_tree: PathBuf,
}

impl GitRepo {
  /// Open the repository containing `path`
  pub fn open(path: &Path) -> BerthResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(BerthError::with_help(
        format!("Not a git repository: {}", path.display()),
        format!("git said: {}", stderr.trim()),
      ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Self {
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  /// Full HEAD commit SHA
  pub fn head_commit(&self) -> BerthResult<String> {
    self.read_line(&["rev-parse", "HEAD"], "Failed to get HEAD commit")
  }

  /// Current branch name, "HEAD" when detached
  pub fn current_branch(&self) -> BerthResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Author name of HEAD
  pub fn head_author(&self) -> BerthResult<String> {
    self.read_line(&["show", "-s", "--format=%an", "HEAD"], "Failed to get commit author")
  }

  /// Author date of HEAD, ISO 8601
  pub fn head_commit_date(&self) -> BerthResult<String> {
    self.read_line(&["show", "-s", "--format=%aI", "HEAD"], "Failed to get commit date")
  }

  /// URL of the `origin` remote, if configured
  pub fn origin_url(&self) -> Option<String> {
    let output = self.git_cmd().args(["remote", "get-url", "origin"]).output().ok()?;
    if !output.status.success() {
      return None;
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if url.is_empty() { None } else { Some(url) }
  }

  /// Assemble the stamp information for this repository
  pub fn info(&self) -> BerthResult<GitInfo> {
    let sha = self.head_commit()?;
    Ok(GitInfo {
      repo: self.work_tree.clone(),
      branch: self.current_branch()?,
      revision: sha.chars().take(7).collect(),
      commit_date: self.head_commit_date()?,
      author: self.head_author()?,
      deployed: chrono::Utc::now().to_rfc3339(),
      url: self.origin_url().map(|url| commit_url(&url, &sha)),
    })
  }

  fn read_line(&self, args: &[&str], context: &str) -> BerthResult<String> {
    let output = self.git_cmd().args(args).output().context(context.to_string())?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(BerthError::message(format!("git {} failed: {}", args.join(" "), stderr.trim())));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the work tree
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

/// Turn a remote URL and SHA into a web link to the commit
fn commit_url(remote: &str, sha: &str) -> String {
  format!("{}/commit/{}", remote.trim_end_matches(".git"), sha)
}
