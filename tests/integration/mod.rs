//! Integration test suite for the berth binary

mod helpers;
mod test_cfg;
mod test_dc;
mod test_nb;
mod test_selfcheck;
mod test_stack;
