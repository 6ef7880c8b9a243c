//! Read models fed by licensing events.
//!
//! This crate provides the query side of the licensing service:
//! - [`Projection`] trait for processing events into read models
//! - [`ReadModel`] trait for query access to denormalized data
//! - [`ProjectionProcessor`] for delivering events to projections
//! - Two views: active licenses per subdivision and subdivision usage

pub mod error;
pub mod processor;
pub mod projection;
pub mod read_model;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use read_model::ReadModel;
pub use views::{ActiveLicenseSummary, ActiveLicensesView, SubdivisionUsage, SubdivisionUsageView};
