//! Check results and their rendering
//!
//! One result is one printed line. The kind decides which labels are
//! spliced into the line and which symbol policy applies: exception and
//! misconfiguration results always render the raised marker, whatever
//! their pass flag says.

use crate::core::error::BerthError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass marker
pub const SYMBOL_PASS: &str = "✅";
/// Fail marker
pub const SYMBOL_FAIL: &str = "❌";
/// Raised marker for exceptions and broken checks
pub const SYMBOL_RAISED: &str = "❗️";

/// Which labels a result carries and how it renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultKind {
  /// Plain message line
  Normal,
  /// Result about one plugin
  PerPlugin { plugin: String },
  /// Result produced from a deployed notebook
  PerNotebook {
    area: String,
    plugin: Option<String>,
    description: String,
  },
  /// Explicit "nothing wrong" placeholder, always passing
  AllGood,
  /// A probe raised; always failing, always the raised marker
  Exception,
  /// The check itself is broken, not its target; passes but stays visible
  Misconfigured { plugin: Option<String> },
}

/// The outcome of one check probe, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
  /// Whether the probed condition held
  pub passed: bool,
  /// Human message for the rendered line
  pub message: String,
  /// Label and symbol policy
  #[serde(flatten)]
  pub kind: ResultKind,
  /// Optional structured payload (carried through untouched)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<serde_json::Value>,
}

impl CheckResult {
  /// Create a plain result
  pub fn new(passed: bool, message: impl Into<String>) -> Self {
    Self {
      passed,
      message: message.into(),
      kind: ResultKind::Normal,
      context: None,
    }
  }

  /// Create a passing plain result
  pub fn pass(message: impl Into<String>) -> Self {
    Self::new(true, message)
  }

  /// Create a failing plain result
  pub fn fail(message: impl Into<String>) -> Self {
    Self::new(false, message)
  }

  /// Create a result about one plugin
  pub fn per_plugin(passed: bool, message: impl Into<String>, plugin: impl Into<String>) -> Self {
    Self {
      passed,
      message: message.into(),
      kind: ResultKind::PerPlugin { plugin: plugin.into() },
      context: None,
    }
  }

  /// Create a result from a notebook-based check
  pub fn per_notebook(
    passed: bool,
    message: impl Into<String>,
    area: impl Into<String>,
    plugin: Option<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      passed,
      message: message.into(),
      kind: ResultKind::PerNotebook {
        area: area.into(),
        plugin,
        description: description.into(),
      },
      context: None,
    }
  }

  /// Placeholder for a check that found nothing wrong
  pub fn all_good(message: impl Into<String>) -> Self {
    Self {
      passed: true,
      message: format!("All good, {}", message.into()),
      kind: ResultKind::AllGood,
      context: None,
    }
  }

  /// Result for a probe that raised an error
  pub fn exception(message: impl Into<String>, error: &BerthError) -> Self {
    Self {
      passed: false,
      message: format!("{} - {}", message.into(), error),
      kind: ResultKind::Exception,
      context: None,
    }
  }

  /// Result for a check that cannot be evaluated correctly
  ///
  /// Passes so a broken check does not fail the run, but renders the
  /// raised marker so a human investigates.
  pub fn misconfigured(message: impl Into<String>, plugin: Option<String>) -> Self {
    Self {
      passed: true,
      message: format!("Config Error: {}", message.into()),
      kind: ResultKind::Misconfigured { plugin },
      context: None,
    }
  }

  /// Attach a structured payload
  pub fn with_context(mut self, context: serde_json::Value) -> Self {
    self.context = Some(context);
    self
  }

  /// The visual marker for this result
  pub fn symbol(&self) -> &'static str {
    match self.kind {
      ResultKind::Exception | ResultKind::Misconfigured { .. } => SYMBOL_RAISED,
      _ => {
        if self.passed {
          SYMBOL_PASS
        } else {
          SYMBOL_FAIL
        }
      }
    }
  }

  /// Render the one-line human form
  pub fn render(&self) -> String {
    match &self.kind {
      ResultKind::Normal | ResultKind::AllGood => format!("{} {}", self.symbol(), self.message),
      ResultKind::PerPlugin { plugin } => format!("{} {}: {}", self.symbol(), plugin, self.message),
      ResultKind::PerNotebook { area, plugin, description } => {
        let mut label = area.clone();
        if let Some(plugin) = plugin {
          label.push(' ');
          label.push_str(plugin);
        }
        format!("{} {} {}: {}", self.symbol(), label, description, self.message)
      }
      ResultKind::Exception => format!("{} Exception: {}", self.symbol(), self.message),
      ResultKind::Misconfigured { plugin } => {
        let plugin = plugin.as_deref().unwrap_or("Unknown Plugin");
        format!("{} {}: {}", self.symbol(), plugin, self.message)
      }
    }
  }
}

impl fmt::Display for CheckResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.render())
  }
}
