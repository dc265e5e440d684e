//! Docker compose fan-out over plugin directories
//!
//! Builds one `docker compose` invocation and runs it in every plugin
//! directory of the stack. Subprocesses run with an isolated environment
//! (PATH/HOME/docker vars whitelisted, stack secrets applied) so a user's
//! shell configuration cannot leak into the stack.

use crate::core::error::{BerthError, BerthResult, ComposeError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A planned compose invocation: normalized args and plugin order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposePlan {
  /// Arguments after `docker compose`
  pub args: Vec<String>,
  /// Plugins in execution order
  pub plugins: Vec<String>,
}

/// Normalize a compose command for fan-out
///
/// `down`/`stop` tear plugins down in reverse start order; `up`/`start`
/// get `-d` appended when absent so the fan-out does not block on the
/// first plugin's foreground logs.
pub fn plan(args: &[String], plugins: Vec<String>) -> ComposePlan {
  let mut args = args.to_vec();
  let mut plugins = plugins;

  if let Some(command) = args.first().map(String::as_str) {
    match command {
      "down" | "stop" => plugins.reverse(),
      "up" | "start" => {
        if !args.iter().any(|a| a == "-d") {
          args.push("-d".to_string());
        }
      }
      _ => {}
    }
  }

  ComposePlan { args, plugins }
}

/// What happened to one plugin during fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOutcome {
  /// Compose exited zero
  Completed { plugin: String },
  /// The plugin directory was missing; nothing ran
  SkippedMissingDir { plugin: String, dir: PathBuf },
  /// Compose exited non-zero
  Failed { plugin: String, status: Option<i32> },
}

/// Runs compose invocations against plugin directories
pub struct ComposeRunner {
  program: String,
}

impl ComposeRunner {
  /// A runner using `docker`
  pub fn new() -> Self {
    Self {
      program: "docker".to_string(),
    }
  }

  /// A runner using another compose-capable engine (e.g. `podman`)
  pub fn with_program(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }

  /// Execute the plan in every plugin directory under `base_dir`
  ///
  /// A failing or missing plugin is recorded and does not stop the rest.
  /// The subprocess inherits stdout/stderr so compose output streams to
  /// the terminal.
  pub fn execute(
    &self,
    plan: &ComposePlan,
    base_dir: &Path,
    envs: &[(String, String)],
  ) -> BerthResult<Vec<PluginOutcome>> {
    let mut outcomes = Vec::with_capacity(plan.plugins.len());

    for plugin in &plan.plugins {
      let plugin_dir = base_dir.join(plugin);
      if !plugin_dir.exists() {
        outcomes.push(PluginOutcome::SkippedMissingDir {
          plugin: plugin.clone(),
          dir: plugin_dir,
        });
        continue;
      }

      let status = self
        .compose_cmd(&plugin_dir, envs)
        .args(&plan.args)
        .status()
        .map_err(|e| BerthError::Compose(ComposeError::SpawnFailed { message: e.to_string() }))?;

      if status.success() {
        outcomes.push(PluginOutcome::Completed { plugin: plugin.clone() });
      } else {
        outcomes.push(PluginOutcome::Failed {
          plugin: plugin.clone(),
          status: status.code(),
        });
      }
    }

    Ok(outcomes)
  }

  /// Create a compose command with an isolated environment
  ///
  /// - Sets the working directory to the plugin directory
  /// - Clears environment variables
  /// - Whitelists PATH, HOME and the docker client variables
  /// - Applies the assembled stack environment on top
  fn compose_cmd(&self, plugin_dir: &Path, envs: &[(String, String)]) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.arg("compose");
    cmd.current_dir(plugin_dir);

    cmd.env_clear();
    for var in ["PATH", "HOME", "DOCKER_HOST", "DOCKER_CONFIG", "DOCKER_CONTEXT"] {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }
    for (key, value) in envs {
      cmd.env(key, value);
    }

    cmd
  }
}

impl Default for ComposeRunner {
  fn default() -> Self {
    Self::new()
  }
}
