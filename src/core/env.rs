//! Secret environment assembly
//!
//! Compose subprocesses and `berth env` share one view of the stack's
//! environment: the berth root and config API URL are always present, and
//! every scalar value in the secrets folder becomes `BERTH_<CONFIG>_<KEY>`.

use crate::core::config::{ConfigStore, ROOT_ENV};
use crate::core::error::BerthResult;
use crate::core::remote::CONFIG_URL_ENV;
use serde_yaml::Value;

/// Assemble the environment variables for the stack
///
/// `~/`-prefixed string values expand to the home directory; list values
/// join with commas; numbers and booleans stringify. Anything deeper is
/// not a secret scalar and is skipped.
pub fn secret_env(store: &ConfigStore, api_url: &str) -> BerthResult<Vec<(String, String)>> {
  let mut envs = vec![
    (ROOT_ENV.to_string(), store.root().display().to_string()),
    (CONFIG_URL_ENV.to_string(), api_url.to_string()),
  ];

  for name in store.secret_names() {
    let Some(config) = store.read(&name)? else {
      continue;
    };
    for (key, value) in &config {
      let Some(key) = key.as_str() else {
        continue;
      };
      let Some(rendered) = render_value(value) else {
        continue;
      };
      let env_name = format!("BERTH_{}_{}", name.to_uppercase(), key.to_uppercase());
      envs.push((env_name, rendered));
    }
  }
  Ok(envs)
}

/// Render the assembled environment as shell export lines
pub fn render_exports(envs: &[(String, String)]) -> Vec<String> {
  envs
    .iter()
    .map(|(key, value)| format!("export {}=\"{}\"", key, value))
    .collect()
}

fn render_value(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(expand_home(s)),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Sequence(seq) => {
      let parts: Vec<String> = seq.iter().filter_map(render_value).collect();
      Some(parts.join(","))
    }
    _ => None,
  }
}

fn expand_home(value: &str) -> String {
  if let Some(rest) = value.strip_prefix("~/") {
    if let Ok(home) = std::env::var("HOME") {
      return format!("{}/{}", home.trim_end_matches('/'), rest);
    }
  }
  value.to_string()
}
