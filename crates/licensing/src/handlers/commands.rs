//! One handler per licensing command.
//!
//! Each handler owns the service for its aggregate and forwards the command
//! payload to the matching use case.

use async_trait::async_trait;
use domain::LicensingCommand;
use messagebus::{BusError, CommandHandler, Dependencies, Inject, MessageKind, Routable};

use crate::bootstrap::{CommandOutput, Licensing};
use crate::error::Result;
use crate::services::{Events, SubdivisionService, TenantService, UserService};

macro_rules! command_handlers {
    ($($handler:ident: $command:ident => $service:ident::$method:ident -> $output:ident;)*) => {
        $(
            pub struct $handler {
                service: $service,
            }

            impl Inject for $handler {
                fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
                    Ok(Self {
                        service: $service::inject(dependencies)?,
                    })
                }
            }

            #[async_trait]
            impl CommandHandler<Licensing> for $handler {
                async fn handle(
                    &self,
                    command: LicensingCommand,
                    events: &mut Events,
                ) -> Result<CommandOutput> {
                    match command {
                        LicensingCommand::$command(command) => {
                            let output = self.service.$method(command, events).await?;
                            Ok(CommandOutput::$output(output))
                        }
                        other => Err(BusError::MissingCommandHandler {
                            command: other.kind().name(),
                        }
                        .into()),
                    }
                }

                fn name(&self) -> &'static str {
                    stringify!($handler)
                }
            }
        )*
    };
}

command_handlers! {
    CreateSubdivisionHandler: CreateSubdivision => SubdivisionService::create_subdivision -> Subdivision;
    UpdateSubdivisionHandler: UpdateSubdivision => SubdivisionService::update_subdivision -> Subdivision;
    DeleteSubdivisionHandler: DeleteSubdivision => SubdivisionService::delete_subdivision -> Subdivision;
    CreateLicenseHandler: CreateLicense => SubdivisionService::add_license -> License;
    UpdateLicenseHandler: UpdateLicense => SubdivisionService::update_license -> License;
    DeleteLicenseHandler: DeleteLicense => SubdivisionService::delete_license -> License;
    ActivateSubdivisionLicenseHandler: ActivateSubdivisionLicense => SubdivisionService::activate_license -> Subdivision;
    DeactivateSubdivisionLicenseHandler: DeactivateSubdivisionLicense => SubdivisionService::deactivate_license -> Subdivision;
    AddStatisticRowHandler: AddStatisticRow => SubdivisionService::add_statistic_row -> Subdivision;
    CreateTenantHandler: CreateTenant => TenantService::create_tenant -> Tenant;
    UpdateTenantHandler: UpdateTenant => TenantService::update_tenant -> Tenant;
    DeleteTenantHandler: DeleteTenant => TenantService::delete_tenant -> Tenant;
    CreateUserHandler: CreateUser => UserService::create_user -> User;
    PromoteUserHandler: PromoteUser => UserService::promote_user -> User;
    DemoteUserHandler: DemoteUser => UserService::demote_user -> User;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common::{SubdivisionId, UserId};
    use domain::{CreateUser, DeleteSubdivision, LicensePolicy};
    use storage::{InMemoryStore, UnitOfWorkFactory};

    use super::*;

    fn dependencies() -> Dependencies {
        let store: Arc<dyn UnitOfWorkFactory> = Arc::new(InMemoryStore::new());
        Dependencies::new()
            .with(store)
            .with(LicensePolicy::default())
    }

    #[tokio::test]
    async fn handler_rejects_foreign_command() {
        let handler = DeleteSubdivisionHandler::inject(&dependencies()).unwrap();
        let mut events = Events::new();

        let err = handler
            .handle(CreateUser { user_id: UserId::new() }.into(), &mut events)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn handler_forwards_to_service() {
        let handler = DeleteSubdivisionHandler::inject(&dependencies()).unwrap();
        let mut events = Events::new();

        let err = handler
            .handle(
                DeleteSubdivision {
                    id: SubdivisionId::new(),
                }
                .into(),
                &mut events,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
        assert_eq!(handler.name(), "DeleteSubdivisionHandler");
    }

    #[test]
    fn injection_needs_a_unit_of_work() {
        let err = match CreateUserHandler::inject(&Dependencies::new()) {
            Ok(_) => panic!("handler built without a unit of work"),
            Err(err) => err,
        };
        assert!(matches!(err, BusError::MissingDependency { .. }));
    }
}
