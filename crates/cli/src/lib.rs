//! Line-oriented front end for the licensing service.
//!
//! Each input line is one JSON-encoded [`domain::LicensingCommand`]. It is
//! dispatched through a fresh message bus session over a shared in-memory
//! store, and the JSON result or error is returned for printing.

pub mod config;
pub mod error;
pub mod publisher;

use std::sync::Arc;

use domain::LicensingCommand;
use licensing::{Collaborators, CommandOutput, InMemoryUserDirectory, Licensing, bootstrap};
use messagebus::Bootstrap;
use projections::{ActiveLicensesView, ProjectionProcessor, SubdivisionUsageView};
use serde_json::Value;
use storage::InMemoryStore;

pub use config::{Config, LogFormat};
pub use error::CliError;
pub use publisher::LogPublisher;

/// The licensing service wired over in-memory collaborators.
pub struct App {
    bootstrap: Bootstrap<Licensing>,
    store: InMemoryStore,
    active_licenses: ActiveLicensesView,
    usage: SubdivisionUsageView,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let store = InMemoryStore::new();
        let active_licenses = ActiveLicensesView::new();
        let usage = SubdivisionUsageView::new();
        let processor = ProjectionProcessor::new()
            .with(active_licenses.clone())
            .with(usage.clone());

        let collaborators = Collaborators {
            unit_of_work: Arc::new(store.clone()),
            publisher: Arc::new(LogPublisher),
            user_directory: Arc::new(InMemoryUserDirectory::new()),
            projections: Arc::new(processor),
            policy: config.license_policy(),
            publisher_config: config.publisher_config(),
        };

        Self {
            bootstrap: bootstrap(collaborators.into_dependencies()),
            store,
            active_licenses,
            usage,
        }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn active_licenses(&self) -> &ActiveLicensesView {
        &self.active_licenses
    }

    pub fn usage(&self) -> &SubdivisionUsageView {
        &self.usage
    }

    /// Dispatches one command in its own bus session.
    pub async fn execute(&self, command: LicensingCommand) -> Result<CommandOutput, CliError> {
        let mut bus = self
            .bootstrap
            .messagebus()
            .map_err(licensing::LicensingError::from)?;
        Ok(bus.dispatch(command).await?)
    }

    /// Handles one input line; blank lines produce no response.
    #[tracing::instrument(skip_all)]
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let outcome = match serde_json::from_str::<LicensingCommand>(line) {
            Ok(command) => self.execute(command).await,
            Err(err) => Err(err.into()),
        };

        let response = match outcome.and_then(|output| {
            serde_json::to_value(output)
                .map_err(|err| CliError::Licensing(licensing::LicensingError::from(err)))
        }) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, kind = %err.kind(), "command failed");
                err.to_response()
            }
        };
        Some(response)
    }
}
