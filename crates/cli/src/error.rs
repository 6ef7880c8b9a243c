//! Errors of a single input line, rendered as JSON responses.

use licensing::{ErrorKind, LicensingError};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The line is not a valid command.
    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] serde_json::Error),

    /// The command was rejected.
    #[error(transparent)]
    Licensing(#[from] LicensingError),
}

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::InvalidCommand(_) => ErrorKind::Validation,
            CliError::Licensing(err) => err.kind(),
        }
    }

    /// JSON body written back for the failed line.
    pub fn to_response(&self) -> Value {
        let kind = self.kind();
        json!({
            "error": self.to_string(),
            "kind": kind.as_str(),
            "status": kind.status_code(),
        })
    }
}
