//! Union Portal Common Utilities
//!
//! Shared infrastructure for all Union Portal crates:
//! - Error types and result aliases
//! - Calendar clock used for ages and export dates
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
