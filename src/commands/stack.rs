//! Stack selection commands

use crate::core::config::ConfigStore;
use crate::core::error::BerthResult;
use crate::core::stack;

/// List configured stacks, marking the current one
pub fn run_stack_ls() -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  let stacks = stack::load_stacks(&config_store)?;
  let current = stack::current_stack(&config_store)?;

  if stacks.is_empty() {
    println!("No stacks configured. Add them to stacks.yaml under {}.", config_store.root().display());
    return Ok(());
  }
  if current.is_none() {
    println!("No current stack set. Use `berth stack set <name>` to select one.");
  }

  for (name, config) in &stacks {
    if current.as_deref() == Some(name) {
      println!("** stack: {} ** (current)", name);
    } else {
      println!("stack: {}", name);
    }
    if let Some(description) = &config.description {
      println!("   {}", description);
    }
    for plugin in config.plugins.iter().flatten() {
      println!("  - {}", plugin);
    }
  }
  Ok(())
}

/// Select the current stack
pub fn run_stack_set(name: &str) -> BerthResult<()> {
  let config_store = ConfigStore::from_env();
  stack::set_current_stack(&config_store, name)?;
  println!("Current stack set to '{}'.", name);
  Ok(())
}
