//! License entity and its activation state machine.

use chrono::{DateTime, Duration, Utc};
use common::{LicenseId, SubdivisionId};
use serde::{Deserialize, Serialize};

use crate::value_objects::{LicensePolicy, LicenseStatus, LicenseType};

/// A usage or time bounded entitlement of one subdivision.
///
/// State transitions:
/// ```text
/// Inactive ──activate──► Active ──deactivate / check──► Inactive
/// ```
/// A license may be activated again after deactivation; activation re-stamps
/// `activated` and opens a new usage window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    id: LicenseId,
    name: String,
    description: String,
    #[serde(rename = "type")]
    license_type: LicenseType,
    subdivision_id: SubdivisionId,
    status: LicenseStatus,
    count_requests: u64,
    activated: Option<DateTime<Utc>>,
    expirated: Option<DateTime<Utc>>,
    created: DateTime<Utc>,
    expiration: DateTime<Utc>,
}

impl License {
    /// Issues a new inactive license under the default policy.
    pub fn make(
        name: impl Into<String>,
        description: impl Into<String>,
        license_type: LicenseType,
        subdivision_id: SubdivisionId,
        count_requests: u64,
    ) -> Self {
        Self::make_with_policy(
            name,
            description,
            license_type,
            subdivision_id,
            count_requests,
            &LicensePolicy::default(),
        )
    }

    /// Issues a new inactive license whose expiration follows `policy`.
    pub fn make_with_policy(
        name: impl Into<String>,
        description: impl Into<String>,
        license_type: LicenseType,
        subdivision_id: SubdivisionId,
        count_requests: u64,
        policy: &LicensePolicy,
    ) -> Self {
        let created = Utc::now();
        Self {
            id: LicenseId::new(),
            name: name.into(),
            description: description.into(),
            license_type,
            subdivision_id,
            status: LicenseStatus::Inactive,
            count_requests,
            activated: None,
            expirated: None,
            created,
            expiration: created + policy.expiration(),
        }
    }

    /// Rebuilds a license from stored state without validation.
    #[allow(clippy::too_many_arguments)]
    pub fn make_from_persistence(
        id: LicenseId,
        name: String,
        description: String,
        license_type: LicenseType,
        subdivision_id: SubdivisionId,
        status: LicenseStatus,
        count_requests: u64,
        activated: Option<DateTime<Utc>>,
        expirated: Option<DateTime<Utc>>,
        created: DateTime<Utc>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            license_type,
            subdivision_id,
            status,
            count_requests,
            activated,
            expirated,
            created,
            expiration,
        }
    }
}

// Query methods
impl License {
    pub fn id(&self) -> LicenseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn license_type(&self) -> LicenseType {
        self.license_type
    }

    pub fn subdivision_id(&self) -> SubdivisionId {
        self.subdivision_id
    }

    pub fn status(&self) -> LicenseStatus {
        self.status
    }

    /// Request cap; only meaningful for [`LicenseType::ByCount`].
    pub fn count_requests(&self) -> u64 {
        self.count_requests
    }

    /// Start of the current activation window.
    pub fn activated(&self) -> Option<DateTime<Utc>> {
        self.activated
    }

    /// When the license was last deactivated.
    pub fn expirated(&self) -> Option<DateTime<Utc>> {
        self.expirated
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Fixed horizon; only meaningful for [`LicenseType::ByTime`].
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }

    pub fn is_type_by_count(&self) -> bool {
        self.license_type == LicenseType::ByCount
    }

    /// Returns true if `usage` at `now` breaches the cap of this license.
    ///
    /// Reaching a count cap exactly already counts as a breach.
    pub fn is_exhausted_by(&self, usage: u64, now: DateTime<Utc>) -> bool {
        match self.license_type {
            LicenseType::ByCount => self.is_cap_reached_by(usage),
            LicenseType::ByTime => self.expiration <= now,
        }
    }

    /// Returns true if `usage` reaches the request cap, whatever the type.
    pub fn is_cap_reached_by(&self, usage: u64) -> bool {
        self.count_requests <= usage
    }
}

// State transitions
impl License {
    /// Activates the license now.
    pub fn activate(&mut self) {
        self.activate_at(Utc::now());
    }

    /// Activates the license, opening a usage window at `now`.
    pub fn activate_at(&mut self, now: DateTime<Utc>) {
        self.status = LicenseStatus::Active;
        self.activated = Some(now);
    }

    /// Deactivates the license now.
    pub fn deactivate(&mut self) {
        self.deactivate_at(Utc::now());
    }

    pub fn deactivate_at(&mut self, now: DateTime<Utc>) {
        self.status = LicenseStatus::Inactive;
        self.expirated = Some(now);
    }

    /// Deactivates the license if `current_usage` breaches its cap.
    pub fn check(&mut self, current_usage: u64) {
        self.check_at(current_usage, Utc::now());
    }

    /// Deactivates the license at `now` if `current_usage` breaches its cap.
    ///
    /// Emits nothing; callers report the transition.
    pub fn check_at(&mut self, current_usage: u64, now: DateTime<Utc>) {
        if self.is_exhausted_by(current_usage, now) {
            self.deactivate_at(now);
        }
    }

    /// Moves the expiration horizon to `created + horizon`.
    pub fn expire_after(&mut self, horizon: Duration) {
        self.expiration = self.created + horizon;
    }

    pub(crate) fn revise(
        &mut self,
        name: String,
        description: String,
        license_type: Option<LicenseType>,
        count_requests: Option<u64>,
    ) {
        self.name = name;
        self.description = description;
        if let Some(license_type) = license_type {
            self.license_type = license_type;
        }
        if let Some(count_requests) = count_requests {
            self.count_requests = count_requests;
        }
    }
}
