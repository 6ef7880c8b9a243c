//! Licensing domain.
//!
//! This crate provides:
//! - the [`Subdivision`] aggregate with its [`License`] and [`StatisticRow`]
//!   entities, which enforces license activation and usage caps
//! - the [`Tenant`] aggregate with its [`User`]s
//! - [`LicensingCommand`] and [`LicensingEvent`], the messages routed by the
//!   message bus
//! - [`DomainError`], the error taxonomy of aggregate operations

pub mod aggregate;
pub mod commands;
pub mod error;
pub mod events;
pub mod subdivision;
pub mod tenant;
pub mod value_objects;

pub use aggregate::{AggregateRoot, DomainEvent};
pub use commands::{
    ActivateSubdivisionLicense, AddStatisticRow, CommandKind, CreateLicense, CreateSubdivision,
    CreateTenant, CreateUser, DeactivateSubdivisionLicense, DeleteLicense, DeleteSubdivision,
    DeleteTenant, DemoteUser, LicensingCommand, PromoteUser, UpdateLicense, UpdateSubdivision,
    UpdateTenant,
};
pub use error::{DomainError, Result};
pub use events::{
    EventKind, LicenseAction, LicenseEventData, LicensingEvent, StatisticRowAction,
    StatisticRowEventData, SubdivisionAction, SubdivisionEventData, TenantAction,
    TenantEventData, UserAction, UserEventData,
};
pub use subdivision::{License, StatisticRow, Subdivision};
pub use tenant::{Tenant, User};
pub use value_objects::{
    DEFAULT_LICENSE_EXPIRATION_DAYS, LicensePolicy, LicenseStatus, LicenseType, WorkStatus,
};
