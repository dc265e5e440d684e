//! Tests for the `dc` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_dc_without_compose_args_fails() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;
  run_berth(&root, &["stack", "set", "dev"])?;

  // Clap enforces at least one trailing compose argument.
  let output = run_berth(&root, &["dc"])?;
  assert!(!output.status.success());
  Ok(())
}

#[test]
fn test_dc_without_current_stack_fails() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;

  let output = run_berth(&root, &["dc", "ps"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("No current stack"));
  Ok(())
}

#[test]
fn test_dc_with_unknown_single_plugin_fails() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;
  run_berth(&root, &["stack", "set", "dev"])?;

  let output = run_berth(&root, &["dc", "--single", "dashboards", "ps"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("not found in stack"));
  Ok(())
}

#[test]
fn test_dc_skips_missing_plugin_dirs() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;
  run_berth(&root, &["stack", "set", "dev"])?;

  // No plugin directories exist, so nothing spawns and every plugin is
  // reported as skipped.
  let output = run_berth(&root, &["dc", "ps"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("postgres"));
  assert!(out.contains("warehouse"));
  assert!(out.contains("skipped"));
  Ok(())
}

#[test]
fn test_dc_announces_plan() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;
  run_berth(&root, &["stack", "set", "dev"])?;

  let output = run_berth(&root, &["dc", "down"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  // down reverses the plugin order.
  assert!(out.contains("Running 'docker compose down' for plugins: warehouse, postgres"));
  Ok(())
}
