//! Error types for weather setup

use thiserror::Error;

/// Main error type for the crate.
///
/// Only construction-time work (loading config, registering zones) can fail.
/// The per-tick path never returns errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid zone: {0}")]
    InvalidZone(String),
}
