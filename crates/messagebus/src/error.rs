//! Message bus error types.

use thiserror::Error;

/// Configuration errors raised while building or running a message bus.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// No handler is registered for the dispatched command.
    #[error("No handler registered for command {command}")]
    MissingCommandHandler { command: &'static str },

    /// A handler asked for a dependency that was never provided.
    #[error("Dependency not available: {dependency}")]
    MissingDependency { dependency: &'static str },

    /// A dispatched command finished without leaving a result behind.
    #[error("Command {command} produced no result")]
    MissingCommandResult { command: &'static str },
}

/// Result type for message bus configuration.
pub type Result<T> = std::result::Result<T, BusError>;
