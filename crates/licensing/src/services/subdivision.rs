//! Subdivision, license and usage use cases.

use std::sync::Arc;

use common::SubdivisionId;
use domain::{
    ActivateSubdivisionLicense, AddStatisticRow, CreateLicense, CreateSubdivision,
    DeactivateSubdivisionLicense, DeleteLicense, DeleteSubdivision, DomainError, License,
    LicensePolicy, LicensingEvent, StatisticRow, Subdivision, UpdateLicense, UpdateSubdivision,
};
use messagebus::{BusError, Dependencies, Inject};
use storage::UnitOfWorkFactory;

use super::Events;
use crate::error::Result;

/// Use cases on the [`Subdivision`] aggregate.
#[derive(Clone)]
pub struct SubdivisionService {
    uow: Arc<dyn UnitOfWorkFactory>,
    policy: LicensePolicy,
}

impl SubdivisionService {
    /// Creates a service; new licenses get their time horizon from `policy`.
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>, policy: LicensePolicy) -> Self {
        Self { uow, policy }
    }

    // Query methods

    pub async fn get_subdivision(&self, id: SubdivisionId) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let subdivision = uow
            .subdivisions()
            .get(id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(id))?;
        Ok(subdivision)
    }

    pub async fn list_subdivisions(&self) -> Result<Vec<Subdivision>> {
        let mut uow = self.uow.begin().await?;
        Ok(uow.subdivisions().list().await?)
    }

    // Command methods

    /// Creates an inactive subdivision of an existing tenant.
    #[tracing::instrument(skip(self, events), fields(tenant_id = %cmd.tenant_id))]
    pub async fn create_subdivision(
        &self,
        cmd: CreateSubdivision,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        uow.tenants()
            .get(cmd.tenant_id)
            .await?
            .ok_or(DomainError::TenantNotFound(cmd.tenant_id))?;

        let subdivision = Subdivision::make(cmd.name, cmd.location, cmd.tenant_id);
        let subdivision = uow.subdivisions().add(subdivision).await?;
        uow.commit().await?;

        tracing::info!(subdivision_id = %subdivision.id(), "subdivision created");
        events
            .infra
            .add_event(LicensingEvent::subdivision_created(&subdivision));
        Ok(subdivision)
    }

    #[tracing::instrument(skip(self, events), fields(subdivision_id = %cmd.id))]
    pub async fn update_subdivision(
        &self,
        cmd: UpdateSubdivision,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.id))?;

        subdivision.update(cmd.name, cmd.location, cmd.link, cmd.work_status);
        let subdivision = uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        events
            .infra
            .add_event(LicensingEvent::subdivision_updated(&subdivision));
        Ok(subdivision)
    }

    #[tracing::instrument(skip(self, events), fields(subdivision_id = %cmd.id))]
    pub async fn delete_subdivision(
        &self,
        cmd: DeleteSubdivision,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let subdivision = uow
            .subdivisions()
            .delete(cmd.id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.id))?;
        uow.commit().await?;

        tracing::info!("subdivision deleted");
        events
            .infra
            .add_event(LicensingEvent::subdivision_deleted(&subdivision));
        Ok(subdivision)
    }

    /// Issues a new inactive license.
    #[tracing::instrument(skip(self, events), fields(subdivision_id = %cmd.subdivision_id))]
    pub async fn add_license(&self, cmd: CreateLicense, events: &mut Events) -> Result<License> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let license = subdivision
            .add_license(
                cmd.name,
                cmd.description,
                cmd.license_type,
                cmd.count_requests,
                &self.policy,
            )
            .clone();
        uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        tracing::info!(license_id = %license.id(), license_type = %license.license_type(), "license issued");
        events.infra.add_event(LicensingEvent::license_created(&license));
        Ok(license)
    }

    #[tracing::instrument(skip(self, events), fields(license_id = %cmd.id))]
    pub async fn update_license(&self, cmd: UpdateLicense, events: &mut Events) -> Result<License> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let license = subdivision
            .update_license(
                cmd.id,
                cmd.name,
                cmd.description,
                cmd.license_type,
                cmd.count_requests,
            )?
            .clone();
        uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        events.infra.add_event(LicensingEvent::license_updated(&license));
        Ok(license)
    }

    #[tracing::instrument(skip(self, events), fields(license_id = %cmd.id))]
    pub async fn delete_license(&self, cmd: DeleteLicense, events: &mut Events) -> Result<License> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let license = subdivision.delete_license(cmd.id)?;
        uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        events.infra.add_event(LicensingEvent::license_deleted(&license));
        Ok(license)
    }

    /// Puts a license in force, retiring any license active before it.
    #[tracing::instrument(skip(self, events), fields(license_id = %cmd.license_id))]
    pub async fn activate_license(
        &self,
        cmd: ActivateSubdivisionLicense,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let produced = subdivision.activate_license(cmd.license_id)?;
        let subdivision = uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        if subdivision.is_active() {
            metrics::counter!("licensing_licenses_activated").increment(1);
            tracing::info!("license activated");
        } else {
            tracing::warn!("license exhausted on activation");
        }
        events.domain.extend(produced);
        Ok(subdivision)
    }

    #[tracing::instrument(skip(self, events), fields(license_id = %cmd.license_id))]
    pub async fn deactivate_license(
        &self,
        cmd: DeactivateSubdivisionLicense,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let produced = subdivision.deactivate_license(cmd.license_id)?;
        let subdivision = uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        events.domain.extend(produced);
        Ok(subdivision)
    }

    /// Records usage against the active license.
    ///
    /// When the row exhausts the license, the subdivision is stopped and a
    /// `SubdivisionLicenseExpired` notification follows the domain events.
    #[tracing::instrument(
        skip(self, events),
        fields(subdivision_id = %cmd.subdivision_id, count_requests = cmd.count_requests)
    )]
    pub async fn add_statistic_row(
        &self,
        cmd: AddStatisticRow,
        events: &mut Events,
    ) -> Result<Subdivision> {
        let mut uow = self.uow.begin().await?;
        let mut subdivision = uow
            .subdivisions()
            .get(cmd.subdivision_id)
            .await?
            .ok_or(DomainError::SubdivisionNotFound(cmd.subdivision_id))?;

        let row = StatisticRow::observed_at(cmd.created, cmd.count_requests, cmd.subdivision_id);
        let produced = subdivision.save_day_statistic(row)?;
        let subdivision = uow.subdivisions().save(subdivision).await?;
        uow.commit().await?;

        metrics::counter!("licensing_statistic_rows_added").increment(1);
        events.domain.extend(produced);
        if !subdivision.is_active() {
            metrics::counter!("licensing_licenses_exhausted").increment(1);
            tracing::warn!(
                total_count_requests = subdivision.total_count_requests(),
                "license exhausted, subdivision stopped"
            );
            events
                .infra
                .add_event(LicensingEvent::subdivision_license_expired(&subdivision));
        }
        Ok(subdivision)
    }
}

impl Inject for SubdivisionService {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self::new(
            dependencies.resolve::<Arc<dyn UnitOfWorkFactory>>()?,
            dependencies.resolve::<LicensePolicy>()?,
        ))
    }
}
