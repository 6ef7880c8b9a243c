//! Handler registration table.

use std::collections::HashMap;

use crate::bus::MessageBus;
use crate::dependencies::{Dependencies, Inject};
use crate::error::BusError;
use crate::handler::{CommandHandler, EventHandler};
use crate::message::{MessageKind, MessageSet, Routable};

/// Kind of the commands in a message set.
pub type CommandKind<M> = <<M as MessageSet>::Command as Routable>::Kind;
/// Kind of the events in a message set.
pub type EventKind<M> = <<M as MessageSet>::Event as Routable>::Kind;

type CommandFactory<M> =
    Box<dyn Fn(&Dependencies) -> Result<Box<dyn CommandHandler<M>>, BusError> + Send + Sync>;
type EventFactory<M> =
    Box<dyn Fn(&Dependencies) -> Result<Box<dyn EventHandler<M>>, BusError> + Send + Sync>;

/// Maps command and event kinds to handler types and builds message buses.
///
/// Registration is typed: a handler is registered by its type and built
/// through [`Inject`] each time [`Bootstrap::messagebus`] is called, so every
/// dispatch session gets fresh handler instances and fresh event buffers.
pub struct Bootstrap<M: MessageSet> {
    dependencies: Dependencies,
    command_factories: HashMap<CommandKind<M>, CommandFactory<M>>,
    event_factories: HashMap<EventKind<M>, Vec<EventFactory<M>>>,
}

impl<M: MessageSet> Bootstrap<M> {
    /// Creates an empty registration table over the given dependency pool.
    pub fn new(dependencies: Dependencies) -> Self {
        Self {
            dependencies,
            command_factories: HashMap::new(),
            event_factories: HashMap::new(),
        }
    }

    /// Registers `H` as the single handler for `kind`.
    ///
    /// Registering a second handler for the same command replaces the first.
    pub fn command<H>(mut self, kind: CommandKind<M>) -> Self
    where
        H: CommandHandler<M> + Inject + 'static,
    {
        let factory: CommandFactory<M> = Box::new(|dependencies| {
            let handler = H::inject(dependencies)?;
            Ok(Box::new(handler) as Box<dyn CommandHandler<M>>)
        });
        if self.command_factories.insert(kind, factory).is_some() {
            tracing::warn!(command = kind.name(), "command handler replaced");
        }
        self
    }

    /// Appends `H` to the handlers of event `kind`.
    ///
    /// Handlers of one event run in registration order.
    pub fn event<H>(mut self, kind: EventKind<M>) -> Self
    where
        H: EventHandler<M> + Inject + 'static,
    {
        let factory: EventFactory<M> = Box::new(|dependencies| {
            let handler = H::inject(dependencies)?;
            Ok(Box::new(handler) as Box<dyn EventHandler<M>>)
        });
        self.event_factories.entry(kind).or_default().push(factory);
        self
    }

    /// Registers `H` for every kind in `kinds`.
    pub fn event_for_all<H>(mut self, kinds: &[EventKind<M>]) -> Self
    where
        H: EventHandler<M> + Inject + 'static,
    {
        for kind in kinds {
            self = self.event::<H>(*kind);
        }
        self
    }

    /// Returns the dependency pool.
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Returns the command kinds that have no registered handler.
    pub fn unhandled_commands(&self) -> Vec<CommandKind<M>> {
        <CommandKind<M> as MessageKind>::ALL
            .iter()
            .filter(|kind| !self.command_factories.contains_key(*kind))
            .copied()
            .collect()
    }

    /// Returns the number of handlers registered for an event kind.
    pub fn event_handler_count(&self, kind: EventKind<M>) -> usize {
        self.event_factories.get(&kind).map_or(0, Vec::len)
    }

    /// Builds a message bus with freshly constructed handlers.
    ///
    /// Fails if any handler asks for a dependency missing from the pool.
    pub fn messagebus(&self) -> Result<MessageBus<M>, BusError> {
        let mut command_handlers = HashMap::with_capacity(self.command_factories.len());
        for (kind, factory) in &self.command_factories {
            let handler = factory(&self.dependencies).inspect_err(|err| {
                tracing::error!(command = kind.name(), error = %err, "cannot build command handler");
            })?;
            command_handlers.insert(*kind, handler);
        }

        let mut event_handlers = HashMap::with_capacity(self.event_factories.len());
        for (kind, factories) in &self.event_factories {
            let mut handlers = Vec::with_capacity(factories.len());
            for factory in factories {
                let handler = factory(&self.dependencies).inspect_err(|err| {
                    tracing::error!(event = kind.name(), error = %err, "cannot build event handler");
                })?;
                handlers.push(handler);
            }
            event_handlers.insert(*kind, handlers);
        }

        Ok(MessageBus::new(command_handlers, event_handlers))
    }
}
