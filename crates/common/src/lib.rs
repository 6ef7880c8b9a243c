//! Shared types for the licensing workspace.

pub mod types;

pub use types::{LicenseId, StatisticRowId, SubdivisionId, TenantId, UserId};
