//! Core building blocks for berth operations
//!
//! - **compose**: docker compose fan-out over plugin directories
//! - **config**: YAML config store under the berth root (with locking)
//! - **env**: secret environment assembly for subprocesses and `berth env`
//! - **error**: error types with contextual help messages
//! - **git**: revision metadata via the system git binary
//! - **notebook**: notebook stamping and deployment
//! - **remote**: configuration API fallback
//! - **stack**: stack and plugin resolution
//! - **store**: object store client

pub mod compose;
pub mod config;
pub mod env;
pub mod error;
pub mod git;
pub mod notebook;
pub mod remote;
pub mod stack;
pub mod store;
