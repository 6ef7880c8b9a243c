//! Tenant use cases.

use std::sync::Arc;

use common::TenantId;
use domain::{CreateTenant, DeleteTenant, DomainError, LicensingEvent, Tenant, UpdateTenant};
use messagebus::{BusError, Dependencies, Inject};
use storage::UnitOfWorkFactory;

use super::Events;
use crate::error::Result;

/// Use cases on the [`Tenant`] aggregate.
#[derive(Clone)]
pub struct TenantService {
    uow: Arc<dyn UnitOfWorkFactory>,
}

impl TenantService {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow }
    }

    // Query methods

    /// Loads a tenant with its subdivisions.
    pub async fn get_tenant(&self, id: TenantId) -> Result<Tenant> {
        let mut uow = self.uow.begin().await?;
        let tenant = uow
            .tenants()
            .get(id)
            .await?
            .ok_or(DomainError::TenantNotFound(id))?;
        Ok(tenant)
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let mut uow = self.uow.begin().await?;
        Ok(uow.tenants().list().await?)
    }

    // Command methods

    /// Creates a tenant owned by `cmd.user_id`.
    ///
    /// A user already known to the service moves to the new tenant and is
    /// reported as updated; otherwise the user is created with the tenant.
    #[tracing::instrument(skip(self, events), fields(user_id = %cmd.user_id))]
    pub async fn create_tenant(&self, cmd: CreateTenant, events: &mut Events) -> Result<Tenant> {
        let mut uow = self.uow.begin().await?;
        let existing = uow.users().get(cmd.user_id).await?;
        let user_is_new = existing.is_none();

        let mut tenant = Tenant::make(cmd.user_id, cmd.name, cmd.address, cmd.email, cmd.phone);
        if let Some(user) = existing {
            tenant.add_user(user);
        }
        let tenant = uow.tenants().add(tenant).await?;
        uow.commit().await?;

        tracing::info!(tenant_id = %tenant.id(), "tenant created");
        events.infra.add_event(LicensingEvent::tenant_created(&tenant));
        if let Some(owner) = tenant.users().iter().find(|user| user.user_id() == cmd.user_id) {
            let event = if user_is_new {
                LicensingEvent::user_created(owner)
            } else {
                LicensingEvent::user_updated(owner)
            };
            events.infra.add_event(event);
        }
        Ok(tenant)
    }

    #[tracing::instrument(skip(self, events), fields(tenant_id = %cmd.id))]
    pub async fn update_tenant(&self, cmd: UpdateTenant, events: &mut Events) -> Result<Tenant> {
        let mut uow = self.uow.begin().await?;
        let mut tenant = uow
            .tenants()
            .get(cmd.id)
            .await?
            .ok_or(DomainError::TenantNotFound(cmd.id))?;

        tenant.update(cmd.name, cmd.address, cmd.email, cmd.phone);
        let tenant = uow.tenants().save(tenant).await?;
        uow.commit().await?;

        events.infra.add_event(LicensingEvent::tenant_updated(&tenant));
        Ok(tenant)
    }

    /// Deletes a tenant together with its subdivisions and users.
    #[tracing::instrument(skip(self, events), fields(tenant_id = %cmd.id))]
    pub async fn delete_tenant(&self, cmd: DeleteTenant, events: &mut Events) -> Result<Tenant> {
        let mut uow = self.uow.begin().await?;
        let tenant = uow
            .tenants()
            .delete(cmd.id)
            .await?
            .ok_or(DomainError::TenantNotFound(cmd.id))?;
        uow.commit().await?;

        tracing::info!(
            subdivisions = tenant.subdivisions().len(),
            users = tenant.users().len(),
            "tenant deleted"
        );
        events.infra.add_event(LicensingEvent::tenant_deleted(&tenant));
        Ok(tenant)
    }
}

impl Inject for TenantService {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self::new(dependencies.resolve::<Arc<dyn UnitOfWorkFactory>>()?))
    }
}
