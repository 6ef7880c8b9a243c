//! Active licenses read model: the license currently in force per subdivision.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{LicenseId, SubdivisionId, TenantId};
use domain::{License, LicenseType, LicensingEvent};
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Summary of the license in force for one subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLicenseSummary {
    pub license_id: LicenseId,
    pub subdivision_id: SubdivisionId,
    pub tenant_id: Option<TenantId>,
    pub name: String,
    pub license_type: LicenseType,
    pub count_requests: u64,
    pub activated: Option<DateTime<Utc>>,
    pub expiration: DateTime<Utc>,
}

impl ActiveLicenseSummary {
    fn from_license(license: &License, tenant_id: Option<TenantId>) -> Self {
        Self {
            license_id: license.id(),
            subdivision_id: license.subdivision_id(),
            tenant_id,
            name: license.name().to_owned(),
            license_type: license.license_type(),
            count_requests: license.count_requests(),
            activated: license.activated(),
            expiration: license.expiration(),
        }
    }
}

#[derive(Default)]
struct State {
    active: HashMap<SubdivisionId, ActiveLicenseSummary>,
    /// Owning tenant of every subdivision seen so far.
    tenants: HashMap<SubdivisionId, TenantId>,
}

/// Read model view of active licenses.
///
/// A license enters the view on `LicenseActivated` and leaves it when it is
/// deactivated or deleted, or when its subdivision or tenant is deleted.
#[derive(Clone)]
pub struct ActiveLicensesView {
    state: Arc<RwLock<State>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl ActiveLicensesView {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    /// Gets the license in force for a subdivision.
    pub async fn get(&self, subdivision_id: SubdivisionId) -> Option<ActiveLicenseSummary> {
        self.state.read().await.active.get(&subdivision_id).cloned()
    }

    /// Gets the licenses in force across all subdivisions of a tenant.
    pub async fn for_tenant(&self, tenant_id: TenantId) -> Vec<ActiveLicenseSummary> {
        let mut licenses: Vec<_> = self
            .state
            .read()
            .await
            .active
            .values()
            .filter(|summary| summary.tenant_id == Some(tenant_id))
            .cloned()
            .collect();
        licenses.sort_by_key(|summary| summary.subdivision_id);
        licenses
    }

    pub async fn get_all(&self) -> Vec<ActiveLicenseSummary> {
        self.state.read().await.active.values().cloned().collect()
    }
}

impl Default for ActiveLicensesView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for ActiveLicensesView {
    fn name(&self) -> &'static str {
        "ActiveLicensesView"
    }

    async fn handle(&self, event: &LicensingEvent) -> Result<()> {
        let applied = matches!(
            event,
            LicensingEvent::SubdivisionCreated(_)
                | LicensingEvent::SubdivisionUpdated(_)
                | LicensingEvent::SubdivisionDeleted(_)
                | LicensingEvent::LicenseActivated(_)
                | LicensingEvent::LicenseDeactivated(_)
                | LicensingEvent::LicenseDeleted(_)
                | LicensingEvent::LicenseUpdated(_)
                | LicensingEvent::TenantDeleted(_)
        );
        {
            let mut state = self.state.write().await;
            match event {
                LicensingEvent::SubdivisionCreated(data) | LicensingEvent::SubdivisionUpdated(data) => {
                    state.tenants.insert(data.id, data.tenant_id);
                    if let Some(summary) = state.active.get_mut(&data.id) {
                        summary.tenant_id = Some(data.tenant_id);
                    }
                }
                LicensingEvent::SubdivisionDeleted(data) => {
                    state.tenants.remove(&data.id);
                    state.active.remove(&data.id);
                }
                LicensingEvent::LicenseActivated(data) => {
                    let license = &data.license;
                    let tenant_id = state.tenants.get(&license.subdivision_id()).copied();
                    state.active.insert(
                        license.subdivision_id(),
                        ActiveLicenseSummary::from_license(license, tenant_id),
                    );
                }
                LicensingEvent::LicenseDeactivated(data) | LicensingEvent::LicenseDeleted(data) => {
                    let license = &data.license;
                    let in_force = state
                        .active
                        .get(&license.subdivision_id())
                        .is_some_and(|summary| summary.license_id == license.id());
                    if in_force {
                        state.active.remove(&license.subdivision_id());
                    }
                }
                LicensingEvent::LicenseUpdated(data) => {
                    let license = &data.license;
                    if let Some(summary) = state.active.get_mut(&license.subdivision_id())
                        && summary.license_id == license.id()
                    {
                        let tenant_id = summary.tenant_id;
                        *summary = ActiveLicenseSummary::from_license(license, tenant_id);
                    }
                }
                LicensingEvent::TenantDeleted(data) => {
                    let tenant_id = data.id;
                    state.active.retain(|_, summary| summary.tenant_id != Some(tenant_id));
                    state.tenants.retain(|_, owner| *owner != tenant_id);
                }
                _ => {}
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.next(applied);
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = State::default();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for ActiveLicensesView {
    fn name(&self) -> &'static str {
        "ActiveLicensesView"
    }

    fn count(&self) -> usize {
        self.state.try_read().map(|state| state.active.len()).unwrap_or(0)
    }
}
