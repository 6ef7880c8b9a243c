//! Outbound collaborators of the licensing service.

pub mod publisher;
pub mod user_directory;

pub use publisher::{
    DEFAULT_TOPIC, EventPublisher, InMemoryPublisher, OutboundMessage, PublisherConfig,
};
pub use user_directory::{InMemoryUserDirectory, UserContacts, UserDirectory};
