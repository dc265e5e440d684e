//! Compose fan-out command

use crate::core::compose::{self, ComposeRunner, PluginOutcome};
use crate::core::config::ConfigStore;
use crate::core::env::secret_env;
use crate::core::error::{BerthError, BerthResult};
use crate::core::remote::ConfigApi;
use crate::core::stack;

/// Run docker compose with the supplied parameters for the stack's plugins
pub fn run_dc(single: Option<String>, extra: Vec<String>) -> BerthResult<()> {
  if extra.is_empty() {
    return Err(BerthError::with_help(
      "A docker compose command must be given",
      "Example: `berth dc up` or `berth dc --single warehouse logs -f`",
    ));
  }

  let config_store = ConfigStore::from_env();
  let api = ConfigApi::from_env();
  let base_dir = std::env::current_dir()?;

  let plugins = stack::resolve_plugins(&config_store, single.as_deref())?;
  let envs = secret_env(&config_store, api.base_url())?;
  let plan = compose::plan(&extra, plugins);

  println!(
    "Running 'docker compose {}' for plugins: {}",
    plan.args.join(" "),
    plan.plugins.join(", ")
  );

  let outcomes = ComposeRunner::new().execute(&plan, &base_dir, &envs)?;
  for outcome in &outcomes {
    match outcome {
      PluginOutcome::Completed { plugin } => println!("✅ {}: done", plugin),
      PluginOutcome::SkippedMissingDir { plugin, dir } => {
        println!("⚠️  {}: directory {} does not exist, skipped", plugin, dir.display());
      }
      PluginOutcome::Failed { plugin, status } => {
        println!(
          "❌ {}: docker compose {} exited with {}",
          plugin,
          plan.args.join(" "),
          status.map(|s| s.to_string()).unwrap_or_else(|| "signal".to_string())
        );
      }
    }
  }

  Ok(())
}
