//! Directory layout checks

use super::check::CheckList;
use super::report::CheckResult;
use std::path::PathBuf;

/// Build the directory checklist
pub fn checks(root: PathBuf, base_dir: PathBuf, plugins: Option<Vec<String>>) -> CheckList {
  let mut list = CheckList::new("directories");

  let root_probe = root.clone();
  list.add("Berth root", "The berth root folder exists", move || {
    if root_probe.is_dir() {
      Ok(CheckResult::pass(format!("Berth root present at {}", root_probe.display())).into())
    } else {
      Ok(CheckResult::fail(format!("Berth root missing: {}", root_probe.display())).into())
    }
  });

  list.add("Config folders", "Config and secrets folders exist", move || {
    let results = ["config", "secrets"]
      .into_iter()
      .map(|folder| {
        let path = root.join(folder);
        if path.is_dir() {
          CheckResult::pass(format!("{}/ present", folder))
        } else {
          CheckResult::fail(format!("{}/ missing under {}", folder, root.display()))
        }
      })
      .collect::<Vec<_>>();
    Ok(results.into())
  });

  list.add("Plugin directories", "Each stack plugin has a directory", move || {
    let Some(plugins) = &plugins else {
      return Ok(CheckResult::misconfigured("stack not resolved, cannot check plugin directories", None).into());
    };
    if plugins.is_empty() {
      return Ok(CheckResult::all_good("no plugin directories required").into());
    }
    let results = plugins
      .iter()
      .map(|plugin| {
        let dir = base_dir.join(plugin);
        if dir.is_dir() {
          CheckResult::per_plugin(true, "directory present", plugin.clone())
        } else {
          CheckResult::per_plugin(false, format!("directory missing: {}", dir.display()), plugin.clone())
        }
      })
      .collect::<Vec<_>>();
    Ok(results.into())
  });

  list
}
