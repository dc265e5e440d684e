//! Tests for the `cfg` commands

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_cfg_ls_lists_config_and_secrets() -> Result<()> {
  let root = TestRoot::new()?;
  root.write_config("stacks", "dev:\n  plugins: [postgres]\n")?;
  root.write_secret("minio", "access_key: berth\n")?;

  let output = run_berth(&root, &["cfg", "ls"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("stacks"));
  assert!(out.contains("minio"));
  Ok(())
}

#[test]
fn test_cfg_ls_verbose_shows_paths() -> Result<()> {
  let root = TestRoot::new()?;
  root.write_config("storage", "url: http://localhost:9000\n")?;

  let output = run_berth(&root, &["cfg", "ls", "--verbose"])?;
  assert!(output.status.success());
  assert!(stdout(&output).contains("storage.yaml"));
  Ok(())
}

#[test]
fn test_cfg_show_falls_back_to_file() -> Result<()> {
  let root = TestRoot::new()?;
  root.write_config("storage", "url: http://localhost:9000\nbucket: notebooks\n")?;

  // The config API is unreachable in tests, so this exercises the fallback.
  let output = run_berth(&root, &["cfg", "show", "storage"])?;
  assert!(output.status.success());
  let out = stdout(&output);
  assert!(out.contains("url"));
  assert!(out.contains("http://localhost:9000"));
  Ok(())
}

#[test]
fn test_cfg_show_json_output() -> Result<()> {
  let root = TestRoot::new()?;
  root.write_config("storage", "url: http://localhost:9000\n")?;

  let output = run_berth(&root, &["cfg", "show", "storage", "--json"])?;
  assert!(output.status.success());
  let parsed: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(parsed["url"], "http://localhost:9000");
  Ok(())
}

#[test]
fn test_cfg_show_missing_config_fails() -> Result<()> {
  let root = TestRoot::new()?;

  let output = run_berth(&root, &["cfg", "show", "ghost"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("not found"));
  Ok(())
}

#[test]
fn test_cfg_rm_deletes_and_reports_missing() -> Result<()> {
  let root = TestRoot::new()?;
  root.write_config("scratch", "a: 1\n")?;

  let output = run_berth(&root, &["cfg", "rm", "scratch"])?;
  assert!(output.status.success());
  assert!(stdout(&output).contains("Deleted config 'scratch'"));

  let again = run_berth(&root, &["cfg", "rm", "scratch"])?;
  assert!(again.status.success());
  assert!(stdout(&again).contains("not found"));
  Ok(())
}
