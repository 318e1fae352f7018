//! # Confetti Error Types
//!
//! All errors the engine can surface to its trigger.

use thiserror::Error;

/// Errors that can occur while starting a confetti session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfettiError {
    /// The host could not provide a drawing surface.
    ///
    /// Nothing can be rendered without one, so `start()` fails fast and no
    /// session is created.
    #[error("drawing surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// Host-provided description of the failure.
        reason: String,
    },
}

impl ConfettiError {
    /// Creates a [`ConfettiError::SurfaceUnavailable`] from any displayable reason.
    #[must_use]
    pub fn surface_unavailable(reason: impl Into<String>) -> Self {
        Self::SurfaceUnavailable {
            reason: reason.into(),
        }
    }
}

/// Result type for confetti operations.
pub type ConfettiResult<T> = Result<T, ConfettiError>;
