//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A berth root with config/secrets folders plus a working directory
pub struct TestRoot {
  _root: TempDir,
  /// Berth root (BERTH_ROOT_PATH)
  pub root: PathBuf,
  /// Working directory commands run in (plugin dirs live here)
  pub work: PathBuf,
}

impl TestRoot {
  /// Create an empty berth root and working directory
  pub fn new() -> Result<Self> {
    let tmp = TempDir::new()?;
    let root = tmp.path().join("berth-root");
    let work = tmp.path().join("work");
    std::fs::create_dir_all(root.join("config"))?;
    std::fs::create_dir_all(root.join("secrets"))?;
    std::fs::create_dir_all(&work)?;
    Ok(Self { _root: tmp, root, work })
  }

  /// Write a YAML file into the config folder
  pub fn write_config(&self, name: &str, yaml: &str) -> Result<()> {
    std::fs::write(self.root.join("config").join(format!("{}.yaml", name)), yaml)?;
    Ok(())
  }

  /// Write a YAML file into the secrets folder
  pub fn write_secret(&self, name: &str, yaml: &str) -> Result<()> {
    std::fs::write(self.root.join("secrets").join(format!("{}.yaml", name)), yaml)?;
    Ok(())
  }

  /// Create a plugin directory in the working directory
  pub fn add_plugin_dir(&self, name: &str) -> Result<PathBuf> {
    let dir = self.work.join(name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
  }

  /// Set up a typical two-stack configuration
  pub fn with_stacks(self) -> Result<Self> {
    self.write_config(
      "stacks",
      "dev:\n  plugins: [postgres, warehouse]\nfull:\n  plugins: [postgres, warehouse, dashboards]\n",
    )?;
    Ok(self)
  }
}

/// Run the berth binary against a test root
///
/// The config API URL points at a port that refuses connections so
/// nothing in the tests depends on the network.
pub fn run_berth(test_root: &TestRoot, args: &[&str]) -> Result<Output> {
  let output = Command::new(env!("CARGO_BIN_EXE_berth"))
    .args(args)
    .current_dir(&test_root.work)
    .env("BERTH_ROOT_PATH", &test_root.root)
    .env("BERTH_CONFIG_URL", "http://127.0.0.1:1")
    .output()
    .context("Failed to run berth binary")?;
  Ok(output)
}

/// Stdout of an output as a string
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of an output as a string
pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Run git in a directory (for notebook stamping tests)
pub fn git(dir: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(args)
    .output()
    .with_context(|| format!("Failed to run git {:?}", args))?;
  if !output.status.success() {
    anyhow::bail!("git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
  }
  Ok(output)
}

/// Initialize a git repo with identity configured
pub fn git_init(dir: &Path) -> Result<()> {
  git(dir, &["init", "--initial-branch=main"])?;
  git(dir, &["config", "user.name", "Test User"])?;
  git(dir, &["config", "user.email", "test@example.com"])?;
  Ok(())
}
