//! Licensing error types.

use std::fmt;

use domain::DomainError;
use messagebus::BusError;
use projections::ProjectionError;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by licensing use cases and handlers.
#[derive(Debug, Error)]
pub enum LicensingError {
    /// An aggregate rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Handler registration or construction error.
    #[error("Message bus error: {0}")]
    Bus(#[from] BusError),

    /// A read model rejected an event.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The outbound broker refused a message.
    #[error("Publish failed: {0}")]
    Publish(String),
}

/// Coarse classification of a [`LicensingError`] for external adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Validation,
    Configuration,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Configuration => "CONFIGURATION",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// HTTP status code equivalent.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::Validation => 422,
            ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LicensingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LicensingError::Domain(err) if err.is_not_found() => ErrorKind::NotFound,
            LicensingError::Domain(err) if err.is_conflict() => ErrorKind::AlreadyExists,
            LicensingError::Domain(_) => ErrorKind::Validation,
            LicensingError::Storage(StorageError::Duplicate { .. }) => ErrorKind::AlreadyExists,
            LicensingError::Storage(StorageError::ConcurrencyConflict { .. }) => {
                ErrorKind::Internal
            }
            LicensingError::Bus(_) => ErrorKind::Configuration,
            LicensingError::Projection(_)
            | LicensingError::Serialization(_)
            | LicensingError::Publish(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience type alias for licensing results.
pub type Result<T> = std::result::Result<T, LicensingError>;
