//! Message bus handlers for licensing commands and events.

pub mod commands;
pub mod events;

pub use commands::*;
pub use events::{OutboundPublisher, ProjectionHandler, UserEnrichmentHandler};
