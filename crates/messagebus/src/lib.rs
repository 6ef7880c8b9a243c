//! In-process message dispatch for commands and events.
//!
//! This crate provides:
//! - [`MessageSet`], [`Routable`] and [`MessageKind`] describing the command
//!   and event types of an application
//! - [`EventBuffer`] / [`EventBuffers`], the per-session sinks handlers push
//!   produced events into
//! - [`Bootstrap`], the registration table that builds handlers from typed
//!   [`Dependencies`]
//! - [`MessageBus`], the single-writer FIFO dispatcher

pub mod bootstrap;
pub mod buffer;
pub mod bus;
pub mod dependencies;
pub mod error;
pub mod handler;
pub mod message;

pub use bootstrap::{Bootstrap, CommandKind, EventKind};
pub use buffer::{EventBuffer, EventBuffers};
pub use bus::MessageBus;
pub use dependencies::{Dependencies, Inject};
pub use error::{BusError, Result};
pub use handler::{CommandHandler, EventHandler};
pub use message::{Message, MessageKind, MessageSet, Routable};
