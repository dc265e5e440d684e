//! Tests for the `stack` commands

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_stack_ls_without_current() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;

  let output = run_berth(&root, &["stack", "ls"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("No current stack set"));
  assert!(out.contains("stack: dev"));
  assert!(out.contains("stack: full"));
  assert!(out.contains("  - postgres"));
  Ok(())
}

#[test]
fn test_stack_set_then_ls_marks_current() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;

  let set = run_berth(&root, &["stack", "set", "dev"])?;
  assert!(set.status.success());
  assert!(stdout(&set).contains("Current stack set to 'dev'"));

  let ls = run_berth(&root, &["stack", "ls"])?;
  let out = stdout(&ls);
  assert!(out.contains("** stack: dev ** (current)"));
  assert!(out.contains("stack: full"));
  Ok(())
}

#[test]
fn test_stack_set_unknown_fails_with_hint() -> Result<()> {
  let root = TestRoot::new()?.with_stacks()?;

  let output = run_berth(&root, &["stack", "set", "nope"])?;
  assert!(!output.status.success());
  let err = stderr(&output);
  assert!(err.contains("not found"));
  // The help lists the stacks that do exist.
  assert!(err.contains("dev"));
  Ok(())
}

#[test]
fn test_stack_ls_with_no_stacks_config() -> Result<()> {
  let root = TestRoot::new()?;

  let output = run_berth(&root, &["stack", "ls"])?;
  assert!(output.status.success());
  assert!(stdout(&output).contains("No stacks configured"));
  Ok(())
}
