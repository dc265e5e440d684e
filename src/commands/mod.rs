//! CLI commands for berth
//!
//! One user-facing command implementation per module:
//!
//! - **dc**: run docker compose across the stack's plugin directories
//! - **stack**: list and select stacks
//! - **cfg**: list, show and delete config files
//! - **nb**: deploy, list and delete notebooks on the object store
//! - **env**: print the assembled stack environment as export lines
//! - **selfcheck**: run all checklists and print one line per result

pub mod cfg;
pub mod dc;
pub mod env;
pub mod nb;
pub mod selfcheck;
pub mod stack;

pub use cfg::{run_cfg_ls, run_cfg_rm, run_cfg_show};
pub use dc::run_dc;
pub use env::run_env;
pub use nb::{run_nb_cfg, run_nb_deploy, run_nb_ls, run_nb_rm};
pub use selfcheck::run_selfcheck;
pub use stack::{run_stack_ls, run_stack_set};
