//! Error handling
//!
//! Defines error types and handling for the library.

pub mod handlers;
pub mod types;

pub use types::*;
