//! Persistence contracts for the licensing aggregates.
//!
//! This crate provides:
//! - repository traits for subdivisions, tenants and users
//! - [`UnitOfWork`] / [`UnitOfWorkFactory`], the transactional scope a use
//!   case runs in
//! - [`InMemoryStore`], a transactional in-memory implementation

pub mod error;
pub mod memory;
pub mod repository;
pub mod unit_of_work;

pub use error::{Result, StorageError};
pub use memory::{InMemoryStore, InMemoryUnitOfWork};
pub use repository::{SubdivisionRepository, TenantRepository, UserRepository};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
