//! Subdivision aggregate implementation.

use chrono::Utc;
use common::{LicenseId, SubdivisionId, TenantId};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRoot;
use crate::error::{DomainError, Result};
use crate::events::LicensingEvent;
use crate::value_objects::{LicensePolicy, LicenseType, WorkStatus};

use super::{License, StatisticRow};

/// Subdivision aggregate root.
///
/// Owns the licenses and the usage log of one subdivision of a tenant and
/// keeps them consistent:
/// - at most one license is active at a time
/// - usage is only accepted while the subdivision and a license are active
/// - usage that reaches the cap of the active license deactivates both the
///   license and the subdivision
///
/// Operations that produce events return them; nothing is buffered inside
/// the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdivision {
    id: SubdivisionId,
    name: String,
    location: String,
    tenant_id: TenantId,
    link_to_subdivision_processing_domain: Option<String>,
    work_status: WorkStatus,
    licenses: Vec<License>,
    statistics: Vec<StatisticRow>,
}

impl AggregateRoot for Subdivision {
    type Id = SubdivisionId;

    fn aggregate_type() -> &'static str {
        "Subdivision"
    }

    fn id(&self) -> SubdivisionId {
        self.id
    }
}

impl Subdivision {
    /// Creates an inactive subdivision with no licenses and no usage.
    pub fn make(name: impl Into<String>, location: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            id: SubdivisionId::new(),
            name: name.into(),
            location: location.into(),
            tenant_id,
            link_to_subdivision_processing_domain: None,
            work_status: WorkStatus::Inactive,
            licenses: Vec::new(),
            statistics: Vec::new(),
        }
    }

    /// Rebuilds a subdivision from stored state, keeping its work status.
    #[allow(clippy::too_many_arguments)]
    pub fn make_from_persistence(
        id: SubdivisionId,
        name: String,
        location: String,
        tenant_id: TenantId,
        work_status: WorkStatus,
        link_to_subdivision_processing_domain: Option<String>,
        licenses: Vec<License>,
        statistics: Vec<StatisticRow>,
    ) -> Self {
        Self {
            id,
            name,
            location,
            tenant_id,
            link_to_subdivision_processing_domain,
            work_status,
            licenses,
            statistics,
        }
    }
}

// Query methods
impl Subdivision {
    pub fn id(&self) -> SubdivisionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Link to the external processing domain serving this subdivision.
    pub fn link_to_processing_domain(&self) -> Option<&str> {
        self.link_to_subdivision_processing_domain.as_deref()
    }

    pub fn work_status(&self) -> WorkStatus {
        self.work_status
    }

    pub fn is_active(&self) -> bool {
        self.work_status == WorkStatus::Active
    }

    /// Licenses in insertion order.
    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }

    /// Usage rows in insertion order.
    pub fn statistics(&self) -> &[StatisticRow] {
        &self.statistics
    }

    pub fn license(&self, id: LicenseId) -> Option<&License> {
        self.licenses.iter().find(|license| license.id() == id)
    }

    /// The first active license in insertion order.
    pub fn active_license(&self) -> Option<&License> {
        self.licenses.iter().find(|license| license.is_active())
    }

    /// Usage recorded strictly after the active license was activated.
    ///
    /// Zero without an active license.
    pub fn total_count_requests(&self) -> u64 {
        let Some(activated) = self.active_license().and_then(License::activated) else {
            return 0;
        };
        self.statistics
            .iter()
            .filter(|row| row.created() > activated)
            .map(StatisticRow::count_requests)
            .fold(0, u64::saturating_add)
    }

    fn license_index(&self, id: LicenseId) -> Result<usize> {
        self.licenses
            .iter()
            .position(|license| license.id() == id)
            .ok_or(DomainError::LicenseNotFound(id))
    }

    fn active_license_index(&self) -> Option<usize> {
        self.licenses.iter().position(License::is_active)
    }
}

// Command methods
impl Subdivision {
    pub fn update(
        &mut self,
        name: impl Into<String>,
        location: impl Into<String>,
        link_to_subdivision_processing_domain: Option<String>,
        work_status: WorkStatus,
    ) {
        self.name = name.into();
        self.location = location.into();
        self.link_to_subdivision_processing_domain = link_to_subdivision_processing_domain;
        self.work_status = work_status;
    }

    pub fn activate(&mut self) {
        self.work_status = WorkStatus::Active;
    }

    pub fn deactivate(&mut self) {
        self.work_status = WorkStatus::Inactive;
    }

    /// Issues a new inactive license for this subdivision.
    ///
    /// No cap or name validation is done; identically named licenses may
    /// coexist.
    pub fn add_license(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        license_type: LicenseType,
        count_requests: u64,
        policy: &LicensePolicy,
    ) -> &License {
        let license = License::make_with_policy(
            name,
            description,
            license_type,
            self.id,
            count_requests,
            policy,
        );
        let index = self.licenses.len();
        self.licenses.push(license);
        &self.licenses[index]
    }

    /// Renames a license and optionally changes its type and cap.
    pub fn update_license(
        &mut self,
        id: LicenseId,
        name: impl Into<String>,
        description: impl Into<String>,
        license_type: Option<LicenseType>,
        count_requests: Option<u64>,
    ) -> Result<&License> {
        let index = self.license_index(id)?;
        self.licenses[index].revise(name.into(), description.into(), license_type, count_requests);
        Ok(&self.licenses[index])
    }

    /// Removes a license and returns it.
    ///
    /// Removing the active license also stops the subdivision.
    pub fn delete_license(&mut self, id: LicenseId) -> Result<License> {
        let index = self.license_index(id)?;
        let mut license = self.licenses.remove(index);
        if license.is_active() {
            license.deactivate();
            self.deactivate();
        }
        Ok(license)
    }

    /// Activates a license and re-evaluates it against usage already recorded.
    ///
    /// Any other active license is deactivated first and reported with
    /// `LicenseDeactivated`. If the activated license is immediately
    /// exhausted, it is reported as `LicenseDeactivated` and the subdivision
    /// is stopped; otherwise the subdivision starts and `LicenseActivated` is
    /// returned.
    pub fn activate_license(&mut self, id: LicenseId) -> Result<Vec<LicensingEvent>> {
        let index = self.license_index(id)?;
        let now = Utc::now();
        let mut events = Vec::new();

        for (position, sibling) in self.licenses.iter_mut().enumerate() {
            if position != index && sibling.is_active() {
                sibling.deactivate_at(now);
                events.push(LicensingEvent::license_deactivated(sibling));
            }
        }

        self.licenses[index].activate_at(now);
        let usage = self.total_count_requests();
        let license = &mut self.licenses[index];
        license.check_at(usage, now);

        if license.is_active() {
            events.push(LicensingEvent::license_activated(license));
            self.activate();
        } else {
            events.push(LicensingEvent::license_deactivated(license));
            self.deactivate();
        }
        Ok(events)
    }

    /// Deactivates a license and stops the subdivision.
    pub fn deactivate_license(&mut self, id: LicenseId) -> Result<Vec<LicensingEvent>> {
        let index = self.license_index(id)?;
        let license = &mut self.licenses[index];
        license.deactivate();
        let event = LicensingEvent::license_deactivated(license);
        self.deactivate();
        Ok(vec![event])
    }

    /// Records one usage observation.
    ///
    /// The cap is evaluated against usage recorded before `row`; if `row`
    /// reaches the request cap of the active license (for either license
    /// type), the license and the subdivision are
    /// deactivated and `LicenseDeactivated` precedes `StatisticRowAdded` in
    /// the returned events. The row is appended either way.
    pub fn save_day_statistic(&mut self, row: StatisticRow) -> Result<Vec<LicensingEvent>> {
        if !self.is_active() {
            return Err(DomainError::SubdivisionInactive(self.id));
        }
        let Some(active) = self.active_license_index() else {
            return Err(DomainError::LicenseInactive(self.id));
        };
        if self.statistics.contains(&row) {
            return Err(DomainError::StatisticAlreadyExists(self.id));
        }

        let mut events = Vec::with_capacity(2);
        let new_total = row.count_requests().saturating_add(self.total_count_requests());
        if self.licenses[active].is_cap_reached_by(new_total) {
            let license = &mut self.licenses[active];
            license.deactivate();
            events.push(LicensingEvent::license_deactivated(license));
            self.deactivate();
        }

        events.push(LicensingEvent::statistic_row_added(&row));
        self.statistics.push(row);
        Ok(events)
    }

    /// Deactivates the active license if recorded usage exhausts it.
    ///
    /// Returns true if a license was deactivated. Emits nothing; meant for
    /// housekeeping outside the command path. The subdivision keeps its work
    /// status; the next usage submission is rejected with `LicenseInactive`
    /// until another license is activated.
    pub fn check_license(&mut self) -> bool {
        let usage = self.total_count_requests();
        let Some(index) = self.active_license_index() else {
            return false;
        };
        let license = &mut self.licenses[index];
        license.check(usage);
        !license.is_active()
    }
}
