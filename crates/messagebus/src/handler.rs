//! Handler traits for commands and events.

use async_trait::async_trait;

use crate::buffer::EventBuffers;
use crate::message::MessageSet;

/// Handles one kind of command and produces the command's result.
///
/// Events produced along the way go into `events`; the bus drains them after
/// the handler returns.
#[async_trait]
pub trait CommandHandler<M: MessageSet>: Send + Sync {
    /// Executes the command.
    async fn handle(
        &self,
        command: M::Command,
        events: &mut EventBuffers<M::Event>,
    ) -> Result<M::Output, M::Error>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Reacts to one kind of event.
#[async_trait]
pub trait EventHandler<M: MessageSet>: Send + Sync {
    /// Reacts to the event, optionally producing further events.
    async fn handle(
        &self,
        event: &M::Event,
        events: &mut EventBuffers<M::Event>,
    ) -> Result<(), M::Error>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
