//! Core aggregate and domain event traits.

use std::fmt::Display;
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, e.g. `LicenseActivated`.
    fn event_type(&self) -> &'static str;

    /// Returns the action tag carried by the event, e.g. `ACTIVATED`.
    fn action(&self) -> &'static str;

    /// Returns the name of the aggregate family the event belongs to.
    fn aggregate_type(&self) -> &'static str;
}

/// Trait for aggregate roots.
///
/// An aggregate is a cluster of domain objects changed only through its
/// root, forming one consistency and transaction boundary. Other aggregates
/// reference it by [`AggregateRoot::Id`] only.
pub trait AggregateRoot: Clone + Send + Sync + 'static {
    /// Identifier type of the root.
    type Id: Copy + Eq + Hash + Display + Send + Sync + 'static;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identifier.
    fn id(&self) -> Self::Id;
}
