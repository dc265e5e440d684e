//! Container runtime checks

use super::check::CheckList;
use super::report::CheckResult;
use crate::core::error::{BerthError, ComposeError};
use std::path::PathBuf;
use std::process::Command;

/// Build the docker checklist
///
/// `plugins` is `None` when stack resolution failed; the per-plugin check
/// then reports itself as misconfigured instead of guessing.
pub fn checks(base_dir: PathBuf, plugins: Option<Vec<String>>) -> CheckList {
  let mut list = CheckList::new("docker");

  list.add("Daemon running", "The docker daemon answers", || {
    let output = docker_cmd(&["info", "--format", "{{.ServerVersion}}"])?;
    if output.status.success() {
      let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
      Ok(CheckResult::pass(format!("Docker daemon is running (server {})", version)).into())
    } else {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      Ok(CheckResult::fail(format!("Docker daemon not reachable: {}", stderr)).into())
    }
  });

  list.add("Compose plugin", "The compose plugin is installed", || {
    let output = docker_cmd(&["compose", "version", "--short"])?;
    if output.status.success() {
      let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
      Ok(CheckResult::pass(format!("Compose plugin available ({})", version)).into())
    } else {
      Ok(CheckResult::fail("Compose plugin not installed").into())
    }
  });

  list.add("Plugin services", "Each plugin has running services", move || {
    let Some(plugins) = &plugins else {
      return Ok(CheckResult::misconfigured("stack not resolved, cannot check plugin services", None).into());
    };
    if plugins.is_empty() {
      return Ok(CheckResult::misconfigured("current stack has no plugins", None).into());
    }

    let mut results = Vec::with_capacity(plugins.len());
    for plugin in plugins {
      let plugin_dir = base_dir.join(plugin);
      if !plugin_dir.exists() {
        results.push(CheckResult::per_plugin(false, "plugin directory missing", plugin.clone()));
        continue;
      }
      let output = Command::new("docker")
        .args(["compose", "ps", "--services", "--status", "running"])
        .current_dir(&plugin_dir)
        .output()
        .map_err(|e| BerthError::Compose(ComposeError::SpawnFailed { message: e.to_string() }))?;
      if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        results.push(CheckResult::per_plugin(false, format!("compose ps failed: {}", stderr), plugin.clone()));
        continue;
      }
      let running = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count();
      if running > 0 {
        results.push(CheckResult::per_plugin(true, format!("{} services running", running), plugin.clone()));
      } else {
        results.push(CheckResult::per_plugin(false, "no services running", plugin.clone()));
      }
    }
    Ok(results.into())
  });

  list
}

fn docker_cmd(args: &[&str]) -> crate::core::error::BerthResult<std::process::Output> {
  Command::new("docker")
    .args(args)
    .output()
    .map_err(|e| BerthError::Compose(ComposeError::SpawnFailed { message: e.to_string() }))
}
