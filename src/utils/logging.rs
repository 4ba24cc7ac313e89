//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the host application (honours `RUST_LOG`, defaults to `info`)
pub fn setup_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

/// Setup logging for tests; safe to call from every test
pub fn setup_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
