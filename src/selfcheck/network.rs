//! Network reachability checks

use super::check::CheckList;
use super::report::CheckResult;
use std::time::Duration;

/// Named HTTP endpoints from the `network` config
pub type Endpoints = Vec<(String, String)>;

/// Build the network checklist
///
/// Probes own their timeouts; the engine enforces none.
pub fn checks(api_url: String, endpoints: Endpoints) -> CheckList {
  let mut list = CheckList::new("network");

  list.add("Config API", "The config API answers", move || {
    match blocking_get(&api_url, Duration::from_secs(2)) {
      Ok(status) => Ok(CheckResult::pass(format!("Config API answers at {} (HTTP {})", api_url, status)).into()),
      Err(reason) => Ok(CheckResult::fail(format!("Config API unreachable at {}: {}", api_url, reason)).into()),
    }
  });

  list.add("Service endpoints", "Configured service endpoints answer", move || {
    if endpoints.is_empty() {
      return Ok(CheckResult::all_good("no service endpoints configured").into());
    }
    let results = endpoints
      .iter()
      .map(|(name, url)| match blocking_get(url, Duration::from_secs(5)) {
        Ok(status) => CheckResult::per_plugin(true, format!("answers (HTTP {})", status), name.clone()),
        Err(reason) => CheckResult::per_plugin(false, format!("unreachable: {}", reason), name.clone()),
      })
      .collect::<Vec<_>>();
    Ok(results.into())
  });

  list
}

/// One GET with an explicit timeout; any HTTP status counts as answering
fn blocking_get(url: &str, timeout: Duration) -> Result<u16, String> {
  let client = reqwest::blocking::Client::builder()
    .timeout(timeout)
    .build()
    .map_err(|e| e.to_string())?;
  let response = client.get(url).send().map_err(|e| e.to_string())?;
  Ok(response.status().as_u16())
}
