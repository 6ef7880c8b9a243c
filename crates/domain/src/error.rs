//! Domain error types.

use common::{LicenseId, SubdivisionId, TenantId, UserId};
use thiserror::Error;

/// Errors raised by aggregate operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No license with this id in the subdivision.
    #[error("License not found: {0}")]
    LicenseNotFound(LicenseId),

    #[error("Subdivision not found: {0}")]
    SubdivisionNotFound(SubdivisionId),

    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Usage was submitted to a subdivision that is not working.
    #[error("Subdivision is inactive: {0}")]
    SubdivisionInactive(SubdivisionId),

    /// Usage was submitted to a subdivision without an active license.
    #[error("Subdivision {0} has no active license")]
    LicenseInactive(SubdivisionId),

    /// The same usage observation was submitted twice.
    #[error("Statistic row already exists for subdivision {0}")]
    StatisticAlreadyExists(SubdivisionId),

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

impl DomainError {
    /// Returns true for the missing-entity variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::LicenseNotFound(_)
                | DomainError::SubdivisionNotFound(_)
                | DomainError::TenantNotFound(_)
                | DomainError::UserNotFound(_)
        )
    }

    /// Returns true for the duplicate-entity variants.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::StatisticAlreadyExists(_) | DomainError::AlreadyExists { .. }
        )
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
