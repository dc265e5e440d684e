//! Self-check engine and built-in checklists
//!
//! The engine is three small pieces: a `CheckResult` (one printed line),
//! a `Check` (one probe plus its captured results) and a `CheckList` (one
//! area's checks, run in insertion order). Environment failures are
//! turned into data at two fixed boundaries: a probe error becomes one
//! exception result inside its check, and an error escaping a whole
//! checklist becomes one exception result at the runner.
//!
//! # Built-in areas
//!
//! - **docker**: daemon, compose plugin, per-plugin running services
//! - **directories**: berth root, config folders, plugin directories
//! - **network**: config API and configured service endpoints
//! - **storage**: object store reachability and bucket listing
//!
//! Notebook-based results come from `notebooks::check_results`, which is
//! not a checklist: the runner appends its stream after all checklists.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut list = CheckList::new("docker");
//! list.add("Daemon running", "The docker daemon answers", || {
//!   Ok(CheckResult::pass("Docker daemon is running").into())
//! });
//! list.execute()?;
//! for result in list.results() {
//!   println!("{}", result.render());
//! }
//! ```

mod check;
mod report;

pub mod dirs;
pub mod docker;
pub mod network;
pub mod notebooks;
pub mod storage;

pub use check::{Check, CheckList, Probe, ProbeOutput, Setup};
pub use report::{CheckResult, ResultKind, SYMBOL_FAIL, SYMBOL_PASS, SYMBOL_RAISED};
