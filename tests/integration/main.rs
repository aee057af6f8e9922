//! Integration test suite

mod config_test;
mod divergence_test;
mod scanner_test;
