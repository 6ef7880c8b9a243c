//! The FIFO message dispatcher.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::bootstrap::{CommandKind, EventKind};
use crate::buffer::EventBuffers;
use crate::error::BusError;
use crate::handler::{CommandHandler, EventHandler};
use crate::message::{Message, MessageKind, MessageSet, Routable};

/// Single-writer dispatcher for one session.
///
/// [`MessageBus::handle`] takes one inbound message and processes the queue
/// until it is empty. After every message both event buffers are drained
/// (domain first, then infra) onto the back of the queue, so produced events
/// are expanded breadth-first: an event raised by a handler runs only after
/// everything that was already queued ahead of it.
pub struct MessageBus<M: MessageSet> {
    command_handlers: HashMap<CommandKind<M>, Box<dyn CommandHandler<M>>>,
    event_handlers: HashMap<EventKind<M>, Vec<Box<dyn EventHandler<M>>>>,
    buffers: EventBuffers<M::Event>,
    queue: VecDeque<Message<M>>,
    command_result: Option<M::Output>,
}

impl<M: MessageSet> MessageBus<M> {
    pub(crate) fn new(
        command_handlers: HashMap<CommandKind<M>, Box<dyn CommandHandler<M>>>,
        event_handlers: HashMap<EventKind<M>, Vec<Box<dyn EventHandler<M>>>>,
    ) -> Self {
        Self {
            command_handlers,
            event_handlers,
            buffers: EventBuffers::new(),
            queue: VecDeque::new(),
            command_result: None,
        }
    }

    /// Processes `message` and every event it transitively produces.
    ///
    /// The first failing handler aborts the drain: the remaining queue and
    /// both buffers are discarded and the error is returned. The result of a
    /// previous call is cleared on entry.
    #[tracing::instrument(skip_all, fields(message = message.name()))]
    pub async fn handle(&mut self, message: Message<M>) -> Result<(), M::Error> {
        let started = Instant::now();
        self.command_result = None;
        self.queue.push_back(message);
        let mut processed = 0_usize;

        while let Some(message) = self.queue.pop_front() {
            let outcome = match message {
                Message::Command(command) => self.handle_command(command).await,
                Message::Event(event) => self.handle_event(event).await,
            };

            if let Err(err) = outcome {
                metrics::counter!("messagebus_dispatch_failures").increment(1);
                tracing::warn!(
                    processed,
                    discarded = self.queue.len(),
                    "handler failed, aborting dispatch"
                );
                self.queue.clear();
                self.buffers.clear();
                return Err(err);
            }

            processed += 1;
            let produced = self.buffers.drain_all();
            self.queue.extend(produced.into_iter().map(Message::Event));
        }

        metrics::histogram!("messagebus_dispatch_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::debug!(processed, "dispatch complete");
        Ok(())
    }

    /// Handles a command and returns its result.
    ///
    /// Convenience over [`MessageBus::handle`] followed by
    /// [`MessageBus::take_command_result`].
    pub async fn dispatch(&mut self, command: M::Command) -> Result<M::Output, M::Error> {
        let name = command.kind().name();
        self.handle(Message::Command(command)).await?;
        self.take_command_result()
            .ok_or_else(|| BusError::MissingCommandResult { command: name }.into())
    }

    /// Publishes an event as the inbound message.
    pub async fn publish(&mut self, event: M::Event) -> Result<(), M::Error> {
        self.handle(Message::Event(event)).await
    }

    /// Returns the result of the last command processed.
    pub fn command_result(&self) -> Option<&M::Output> {
        self.command_result.as_ref()
    }

    /// Takes the result of the last command processed.
    pub fn take_command_result(&mut self) -> Option<M::Output> {
        self.command_result.take()
    }

    /// Returns true if a handler is registered for the command kind.
    pub fn handles_command(&self, kind: CommandKind<M>) -> bool {
        self.command_handlers.contains_key(&kind)
    }

    /// Returns the number of handlers for the event kind.
    pub fn event_handler_count(&self, kind: EventKind<M>) -> usize {
        self.event_handlers.get(&kind).map_or(0, Vec::len)
    }

    async fn handle_command(&mut self, command: M::Command) -> Result<(), M::Error> {
        let kind = command.kind();
        let handler = self
            .command_handlers
            .get(&kind)
            .ok_or(BusError::MissingCommandHandler {
                command: kind.name(),
            })?;

        tracing::debug!(command = kind.name(), handler = handler.name(), "handling command");
        let output = handler.handle(command, &mut self.buffers).await?;
        metrics::counter!("messagebus_commands_handled").increment(1);
        self.command_result = Some(output);
        Ok(())
    }

    async fn handle_event(&mut self, event: M::Event) -> Result<(), M::Error> {
        let kind = event.kind();
        let Some(handlers) = self.event_handlers.get(&kind) else {
            tracing::debug!(event = kind.name(), "no handlers registered for event");
            return Ok(());
        };

        for handler in handlers {
            tracing::debug!(event = kind.name(), handler = handler.name(), "handling event");
            handler.handle(&event, &mut self.buffers).await?;
        }
        metrics::counter!("messagebus_events_handled").increment(1);
        Ok(())
    }
}
