//! Message traits and the command/event sum type.

use std::fmt;
use std::hash::Hash;

use crate::error::BusError;

/// Discriminant of a command or event type.
///
/// Kinds are used as registry keys, so each variant of an application's
/// command or event enum maps to exactly one kind.
pub trait MessageKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every kind of this message category.
    const ALL: &'static [Self];

    /// Stable name used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// A message that can be routed to handlers by its kind.
pub trait Routable: fmt::Debug {
    /// The discriminant type.
    type Kind: MessageKind;

    /// Returns the kind of this message.
    fn kind(&self) -> Self::Kind;
}

/// Bundles the types a message bus works with.
///
/// Implemented by a marker type per application so that handler traits and
/// the bus only carry one type parameter.
pub trait MessageSet: Send + Sync + 'static {
    /// Intents to change state; handled by exactly one handler.
    type Command: Routable + Send + 'static;

    /// Facts that already happened; broadcast to zero or more handlers.
    type Event: Routable + Clone + Send + Sync + 'static;

    /// Value produced by a command handler.
    type Output: Send + 'static;

    /// Error type shared by all handlers.
    type Error: From<BusError> + Send + 'static;
}

/// A single unit of work for the bus: either a command or an event.
pub enum Message<M: MessageSet> {
    Command(M::Command),
    Event(M::Event),
}

impl<M: MessageSet> Message<M> {
    /// Returns the name of the wrapped command or event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Command(command) => command.kind().name(),
            Message::Event(event) => event.kind().name(),
        }
    }

    /// Returns true if this message is a command.
    pub fn is_command(&self) -> bool {
        matches!(self, Message::Command(_))
    }
}

impl<M: MessageSet> fmt::Debug for Message<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Message::Event(event) => f.debug_tuple("Event").field(event).finish(),
        }
    }
}
