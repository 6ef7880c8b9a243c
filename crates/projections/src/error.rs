//! Projection error types.

use thiserror::Error;

/// Errors that can occur during projection processing.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A projection rejected an event.
    #[error("Projection {projection} failed: {reason}")]
    Projection {
        projection: &'static str,
        reason: String,
    },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
