//! Integration test modules.

mod connection_test;
mod runner_test;
