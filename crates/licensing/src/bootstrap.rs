//! Message set and handler registration of the licensing service.

use std::sync::Arc;

use domain::{
    CommandKind, EventKind, License, LicensePolicy, LicensingCommand, LicensingEvent, Subdivision,
    Tenant, User,
};
use messagebus::{Bootstrap, Dependencies, MessageKind, MessageSet};
use projections::ProjectionProcessor;
use serde::Serialize;
use storage::UnitOfWorkFactory;

use crate::adapters::{EventPublisher, PublisherConfig, UserDirectory};
use crate::error::LicensingError;
use crate::handlers::*;

/// Message set of the licensing service.
#[derive(Debug)]
pub struct Licensing;

impl MessageSet for Licensing {
    type Command = LicensingCommand;
    type Event = LicensingEvent;
    type Output = CommandOutput;
    type Error = LicensingError;
}

/// Result of a licensing command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum CommandOutput {
    Subdivision(Subdivision),
    License(License),
    Tenant(Tenant),
    User(User),
}

impl CommandOutput {
    pub fn into_subdivision(self) -> Option<Subdivision> {
        match self {
            CommandOutput::Subdivision(subdivision) => Some(subdivision),
            _ => None,
        }
    }

    pub fn into_license(self) -> Option<License> {
        match self {
            CommandOutput::License(license) => Some(license),
            _ => None,
        }
    }

    pub fn into_tenant(self) -> Option<Tenant> {
        match self {
            CommandOutput::Tenant(tenant) => Some(tenant),
            _ => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            CommandOutput::User(user) => Some(user),
            _ => None,
        }
    }
}

/// Everything the licensing handlers are built from.
pub struct Collaborators {
    pub unit_of_work: Arc<dyn UnitOfWorkFactory>,
    pub publisher: Arc<dyn EventPublisher>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub projections: Arc<ProjectionProcessor>,
    pub policy: LicensePolicy,
    pub publisher_config: PublisherConfig,
}

impl Collaborators {
    pub fn into_dependencies(self) -> Dependencies {
        Dependencies::new()
            .with(self.unit_of_work)
            .with(self.publisher)
            .with(self.user_directory)
            .with(self.projections)
            .with(self.policy)
            .with(self.publisher_config)
    }
}

/// Registers every licensing handler.
///
/// Each event is first applied to the read models, then published; user
/// creations are enriched last.
pub fn bootstrap(dependencies: Dependencies) -> Bootstrap<Licensing> {
    let bootstrap = Bootstrap::<Licensing>::new(dependencies)
        .command::<CreateSubdivisionHandler>(CommandKind::CreateSubdivision)
        .command::<UpdateSubdivisionHandler>(CommandKind::UpdateSubdivision)
        .command::<DeleteSubdivisionHandler>(CommandKind::DeleteSubdivision)
        .command::<CreateLicenseHandler>(CommandKind::CreateLicense)
        .command::<UpdateLicenseHandler>(CommandKind::UpdateLicense)
        .command::<DeleteLicenseHandler>(CommandKind::DeleteLicense)
        .command::<ActivateSubdivisionLicenseHandler>(CommandKind::ActivateSubdivisionLicense)
        .command::<DeactivateSubdivisionLicenseHandler>(
            CommandKind::DeactivateSubdivisionLicense,
        )
        .command::<AddStatisticRowHandler>(CommandKind::AddStatisticRow)
        .command::<CreateTenantHandler>(CommandKind::CreateTenant)
        .command::<UpdateTenantHandler>(CommandKind::UpdateTenant)
        .command::<DeleteTenantHandler>(CommandKind::DeleteTenant)
        .command::<CreateUserHandler>(CommandKind::CreateUser)
        .command::<PromoteUserHandler>(CommandKind::PromoteUser)
        .command::<DemoteUserHandler>(CommandKind::DemoteUser)
        .event_for_all::<ProjectionHandler>(EventKind::ALL)
        .event_for_all::<OutboundPublisher>(EventKind::ALL)
        .event::<UserEnrichmentHandler>(EventKind::UserCreated);

    tracing::debug!(
        dependencies = bootstrap.dependencies().len(),
        "licensing handlers registered"
    );
    bootstrap
}
