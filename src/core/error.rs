//! Error types for berth with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Every error includes a helpful suggestion
//! to guide users toward resolution.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for berth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (docker, network, I/O)
  System = 2,
  /// Validation failure (stack resolution, store access)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for berth
#[derive(Debug)]
pub enum BerthError {
  /// Configuration errors
  Config(ConfigError),

  /// Docker compose invocation errors
  Compose(ComposeError),

  /// Object store errors
  Store(StoreError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl BerthError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    BerthError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    BerthError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      BerthError::Message { message, context, help } => BerthError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => BerthError::Message {
        help: other.help_message(),
        message: other.to_string(),
        context: Some(ctx_str),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      BerthError::Config(_) => ExitCode::User,
      BerthError::Compose(_) => ExitCode::System,
      BerthError::Store(_) => ExitCode::Validation,
      BerthError::Io(_) => ExitCode::System,
      BerthError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      BerthError::Config(e) => e.help_message(),
      BerthError::Compose(e) => e.help_message(),
      BerthError::Store(e) => e.help_message(),
      BerthError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for BerthError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BerthError::Config(e) => write!(f, "{}", e),
      BerthError::Compose(e) => write!(f, "{}", e),
      BerthError::Store(e) => write!(f, "{}", e),
      BerthError::Io(e) => write!(f, "I/O error: {}", e),
      BerthError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for BerthError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      BerthError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for BerthError {
  fn from(err: io::Error) -> Self {
    BerthError::Io(err)
  }
}

impl From<String> for BerthError {
  fn from(msg: String) -> Self {
    BerthError::message(msg)
  }
}

impl From<&str> for BerthError {
  fn from(msg: &str) -> Self {
    BerthError::message(msg)
  }
}

impl From<serde_yaml::Error> for BerthError {
  fn from(err: serde_yaml::Error) -> Self {
    BerthError::message(format!("YAML error: {}", err))
  }
}

impl From<serde_json::Error> for BerthError {
  fn from(err: serde_json::Error) -> Self {
    BerthError::message(format!("JSON error: {}", err))
  }
}

impl From<reqwest::Error> for BerthError {
  fn from(err: reqwest::Error) -> Self {
    BerthError::message(format!("HTTP error: {}", err))
  }
}

impl From<std::env::VarError> for BerthError {
  fn from(err: std::env::VarError) -> Self {
    BerthError::message(format!("Environment variable error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for BerthError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    BerthError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file not found under the berth root
  NotFound { name: String, root: PathBuf },

  /// A config name was required but empty
  EmptyName,

  /// Missing required key in a config document
  MissingKey { config: String, key: String },

  /// Stack not found in stacks config
  StackNotFound { name: String, available: Vec<String> },

  /// No current stack selected
  NoCurrentStack,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { name, root } => Some(format!(
        "Create {}/config/{}.yaml or start the config API.",
        root.display(),
        name
      )),
      ConfigError::StackNotFound { available, .. } => Some(format!(
        "Available stacks: {}. Use `berth stack ls` to inspect them.",
        available.join(", ")
      )),
      ConfigError::NoCurrentStack => Some("Use `berth stack set <name>` to select a stack.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { name, root } => {
        write!(f, "Config '{}' not found under {}", name, root.display())
      }
      ConfigError::EmptyName => {
        write!(f, "A config name must be provided")
      }
      ConfigError::MissingKey { config, key } => {
        write!(f, "Malformed config '{}': key '{}' is missing", config, key)
      }
      ConfigError::StackNotFound { name, .. } => {
        write!(f, "Stack '{}' not found in stacks config", name)
      }
      ConfigError::NoCurrentStack => {
        write!(f, "No current stack set")
      }
    }
  }
}

/// Docker invocation errors
#[derive(Debug)]
pub enum ComposeError {
  /// The docker subprocess could not be spawned
  SpawnFailed { message: String },
}

impl ComposeError {
  fn help_message(&self) -> Option<String> {
    match self {
      ComposeError::SpawnFailed { .. } => {
        Some("Is docker installed and on PATH? Run `berth selfcheck` to diagnose.".to_string())
      }
    }
  }
}

impl fmt::Display for ComposeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ComposeError::SpawnFailed { message } => {
        write!(f, "Failed to execute docker: {}", message)
      }
    }
  }
}

/// Object store errors
#[derive(Debug)]
pub enum StoreError {
  /// Store endpoint unreachable
  Unreachable { endpoint: String, reason: String },

  /// Server rejected a request
  RequestFailed { operation: String, key: String, status: u16 },

  /// Response body could not be interpreted
  BadResponse { operation: String, reason: String },
}

impl StoreError {
  fn help_message(&self) -> Option<String> {
    match self {
      StoreError::Unreachable { .. } => {
        Some("Check the `storage` config and that the stack is up (`berth dc up`).".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::Unreachable { endpoint, reason } => {
        write!(f, "Object store at {} is unreachable: {}", endpoint, reason)
      }
      StoreError::RequestFailed { operation, key, status } => {
        write!(f, "Store {} of '{}' failed with HTTP {}", operation, key, status)
      }
      StoreError::BadResponse { operation, reason } => {
        write!(f, "Store {} returned an unusable response: {}", operation, reason)
      }
    }
  }
}

/// Result type alias used throughout berth
pub type BerthResult<T> = Result<T, BerthError>;

/// Extension trait for adding context to results
pub trait ResultExt<T> {
  /// Add a static context message
  fn context(self, ctx: impl Into<String>) -> BerthResult<T>;

  /// Add a lazily-evaluated context message
  fn with_context<F>(self, f: F) -> BerthResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<BerthError>,
{
  fn context(self, ctx: impl Into<String>) -> BerthResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> BerthResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &BerthError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to BerthError (for the binary rim)
impl From<anyhow::Error> for BerthError {
  fn from(err: anyhow::Error) -> Self {
    BerthError::message(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exit_codes_by_category() {
    let config = BerthError::Config(ConfigError::EmptyName);
    assert_eq!(config.exit_code(), ExitCode::User);

    let compose = BerthError::Compose(ComposeError::SpawnFailed {
      message: "not found".to_string(),
    });
    assert_eq!(compose.exit_code(), ExitCode::System);

    let store = BerthError::Store(StoreError::Unreachable {
      endpoint: "http://localhost:9000".to_string(),
      reason: "refused".to_string(),
    });
    assert_eq!(store.exit_code(), ExitCode::Validation);
  }

  #[test]
  fn test_stack_not_found_help_lists_stacks() {
    let err = BerthError::Config(ConfigError::StackNotFound {
      name: "nope".to_string(),
      available: vec!["dev".to_string(), "full".to_string()],
    });
    let help = err.help_message().unwrap();
    assert!(help.contains("dev"));
    assert!(help.contains("full"));
  }

  #[test]
  fn test_context_is_appended() {
    let err = BerthError::message("base failure").context("while loading stacks");
    let rendered = err.to_string();
    assert!(rendered.contains("base failure"));
    assert!(rendered.contains("while loading stacks"));
  }
}
