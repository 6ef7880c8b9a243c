//! Licensing service use cases on top of the message bus.
//!
//! This crate provides:
//! - [`SubdivisionService`], [`TenantService`] and [`UserService`], the use
//!   cases run inside one unit of work each
//! - one command handler per [`domain::LicensingCommand`] and the event
//!   handlers that publish events, feed read models and enrich new users
//! - [`bootstrap()`], the registration table for the [`Licensing`] message set
//! - [`LicensingError`] with its [`ErrorKind`] classification

pub mod adapters;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod services;

pub use adapters::{
    DEFAULT_TOPIC, EventPublisher, InMemoryPublisher, InMemoryUserDirectory, OutboundMessage,
    PublisherConfig, UserContacts, UserDirectory,
};
pub use bootstrap::{Collaborators, CommandOutput, Licensing, bootstrap};
pub use error::{ErrorKind, LicensingError, Result};
pub use services::{Events, SubdivisionService, TenantService, UserService};
