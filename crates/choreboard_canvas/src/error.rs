//! # Canvas Error Types
//!
//! Errors from the hosts and the replay tool.

use std::fmt;

use choreboard_confetti::ConfettiError;
use thiserror::Error;

/// Errors that can occur outside the engine itself.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML for [`ReplayConfig`](crate::ReplayConfig).
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading a config or writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine refused to start.
    #[error(transparent)]
    Confetti(#[from] ConfettiError),
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Logs a failed host call the session can outlive and yields its value.
///
/// Browser drawing calls report failures as values; a failure leaves the
/// frame partly drawn but must not end the session.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn warn_on_failure<T, E: fmt::Display>(operation: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(operation, error = %err, "host call failed");
            None
        }
    }
}
