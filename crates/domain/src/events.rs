//! Licensing domain events.
//!
//! Every event carries a full snapshot of the entity it is about plus an
//! `action` tag, so outbound consumers never have to look anything up.

use common::{SubdivisionId, TenantId};
use messagebus::{MessageKind, Routable};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::subdivision::{License, StatisticRow, Subdivision};
use crate::tenant::{Tenant, User};
use crate::value_objects::WorkStatus;

/// Events that can occur in the licensing domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LicensingEvent {
    SubdivisionCreated(SubdivisionEventData),
    SubdivisionUpdated(SubdivisionEventData),
    SubdivisionDeleted(SubdivisionEventData),

    /// A usage submission exhausted the active license and stopped the
    /// subdivision.
    SubdivisionLicenseExpired(SubdivisionEventData),

    LicenseCreated(LicenseEventData),
    LicenseUpdated(LicenseEventData),
    LicenseDeleted(LicenseEventData),
    LicenseActivated(LicenseEventData),
    LicenseDeactivated(LicenseEventData),

    StatisticRowAdded(StatisticRowEventData),

    TenantCreated(TenantEventData),
    TenantUpdated(TenantEventData),
    TenantDeleted(TenantEventData),

    UserCreated(UserEventData),
    UserUpdated(UserEventData),
}

/// Discriminant of [`LicensingEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SubdivisionCreated,
    SubdivisionUpdated,
    SubdivisionDeleted,
    SubdivisionLicenseExpired,
    LicenseCreated,
    LicenseUpdated,
    LicenseDeleted,
    LicenseActivated,
    LicenseDeactivated,
    StatisticRowAdded,
    TenantCreated,
    TenantUpdated,
    TenantDeleted,
    UserCreated,
    UserUpdated,
}

impl MessageKind for EventKind {
    const ALL: &'static [Self] = &[
        EventKind::SubdivisionCreated,
        EventKind::SubdivisionUpdated,
        EventKind::SubdivisionDeleted,
        EventKind::SubdivisionLicenseExpired,
        EventKind::LicenseCreated,
        EventKind::LicenseUpdated,
        EventKind::LicenseDeleted,
        EventKind::LicenseActivated,
        EventKind::LicenseDeactivated,
        EventKind::StatisticRowAdded,
        EventKind::TenantCreated,
        EventKind::TenantUpdated,
        EventKind::TenantDeleted,
        EventKind::UserCreated,
        EventKind::UserUpdated,
    ];

    fn name(&self) -> &'static str {
        match self {
            EventKind::SubdivisionCreated => "SubdivisionCreated",
            EventKind::SubdivisionUpdated => "SubdivisionUpdated",
            EventKind::SubdivisionDeleted => "SubdivisionDeleted",
            EventKind::SubdivisionLicenseExpired => "SubdivisionLicenseExpired",
            EventKind::LicenseCreated => "LicenseCreated",
            EventKind::LicenseUpdated => "LicenseUpdated",
            EventKind::LicenseDeleted => "LicenseDeleted",
            EventKind::LicenseActivated => "LicenseActivated",
            EventKind::LicenseDeactivated => "LicenseDeactivated",
            EventKind::StatisticRowAdded => "StatisticRowAdded",
            EventKind::TenantCreated => "TenantCreated",
            EventKind::TenantUpdated => "TenantUpdated",
            EventKind::TenantDeleted => "TenantDeleted",
            EventKind::UserCreated => "UserCreated",
            EventKind::UserUpdated => "UserUpdated",
        }
    }
}

impl Routable for LicensingEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            LicensingEvent::SubdivisionCreated(_) => EventKind::SubdivisionCreated,
            LicensingEvent::SubdivisionUpdated(_) => EventKind::SubdivisionUpdated,
            LicensingEvent::SubdivisionDeleted(_) => EventKind::SubdivisionDeleted,
            LicensingEvent::SubdivisionLicenseExpired(_) => EventKind::SubdivisionLicenseExpired,
            LicensingEvent::LicenseCreated(_) => EventKind::LicenseCreated,
            LicensingEvent::LicenseUpdated(_) => EventKind::LicenseUpdated,
            LicensingEvent::LicenseDeleted(_) => EventKind::LicenseDeleted,
            LicensingEvent::LicenseActivated(_) => EventKind::LicenseActivated,
            LicensingEvent::LicenseDeactivated(_) => EventKind::LicenseDeactivated,
            LicensingEvent::StatisticRowAdded(_) => EventKind::StatisticRowAdded,
            LicensingEvent::TenantCreated(_) => EventKind::TenantCreated,
            LicensingEvent::TenantUpdated(_) => EventKind::TenantUpdated,
            LicensingEvent::TenantDeleted(_) => EventKind::TenantDeleted,
            LicensingEvent::UserCreated(_) => EventKind::UserCreated,
            LicensingEvent::UserUpdated(_) => EventKind::UserUpdated,
        }
    }
}

impl DomainEvent for LicensingEvent {
    fn event_type(&self) -> &'static str {
        self.kind().name()
    }

    fn action(&self) -> &'static str {
        match self {
            LicensingEvent::SubdivisionCreated(data)
            | LicensingEvent::SubdivisionUpdated(data)
            | LicensingEvent::SubdivisionDeleted(data)
            | LicensingEvent::SubdivisionLicenseExpired(data) => data.action.as_str(),
            LicensingEvent::LicenseCreated(data)
            | LicensingEvent::LicenseUpdated(data)
            | LicensingEvent::LicenseDeleted(data)
            | LicensingEvent::LicenseActivated(data)
            | LicensingEvent::LicenseDeactivated(data) => data.action.as_str(),
            LicensingEvent::StatisticRowAdded(data) => data.action.as_str(),
            LicensingEvent::TenantCreated(data)
            | LicensingEvent::TenantUpdated(data)
            | LicensingEvent::TenantDeleted(data) => data.action.as_str(),
            LicensingEvent::UserCreated(data) | LicensingEvent::UserUpdated(data) => {
                data.action.as_str()
            }
        }
    }

    fn aggregate_type(&self) -> &'static str {
        match self {
            LicensingEvent::SubdivisionCreated(_)
            | LicensingEvent::SubdivisionUpdated(_)
            | LicensingEvent::SubdivisionDeleted(_)
            | LicensingEvent::SubdivisionLicenseExpired(_) => "Subdivision",
            LicensingEvent::LicenseCreated(_)
            | LicensingEvent::LicenseUpdated(_)
            | LicensingEvent::LicenseDeleted(_)
            | LicensingEvent::LicenseActivated(_)
            | LicensingEvent::LicenseDeactivated(_) => "License",
            LicensingEvent::StatisticRowAdded(_) => "StatisticRow",
            LicensingEvent::TenantCreated(_)
            | LicensingEvent::TenantUpdated(_)
            | LicensingEvent::TenantDeleted(_) => "Tenant",
            LicensingEvent::UserCreated(_) | LicensingEvent::UserUpdated(_) => "User",
        }
    }
}

// Constructors
impl LicensingEvent {
    pub fn subdivision_created(subdivision: &Subdivision) -> Self {
        Self::SubdivisionCreated(SubdivisionEventData::new(subdivision, SubdivisionAction::Created))
    }

    pub fn subdivision_updated(subdivision: &Subdivision) -> Self {
        Self::SubdivisionUpdated(SubdivisionEventData::new(subdivision, SubdivisionAction::Updated))
    }

    pub fn subdivision_deleted(subdivision: &Subdivision) -> Self {
        Self::SubdivisionDeleted(SubdivisionEventData::new(subdivision, SubdivisionAction::Deleted))
    }

    pub fn subdivision_license_expired(subdivision: &Subdivision) -> Self {
        Self::SubdivisionLicenseExpired(SubdivisionEventData::new(
            subdivision,
            SubdivisionAction::LicenseExpired,
        ))
    }

    pub fn license_created(license: &License) -> Self {
        Self::LicenseCreated(LicenseEventData::new(license, LicenseAction::Created))
    }

    pub fn license_updated(license: &License) -> Self {
        Self::LicenseUpdated(LicenseEventData::new(license, LicenseAction::Updated))
    }

    pub fn license_deleted(license: &License) -> Self {
        Self::LicenseDeleted(LicenseEventData::new(license, LicenseAction::Deleted))
    }

    pub fn license_activated(license: &License) -> Self {
        Self::LicenseActivated(LicenseEventData::new(license, LicenseAction::Activated))
    }

    pub fn license_deactivated(license: &License) -> Self {
        Self::LicenseDeactivated(LicenseEventData::new(license, LicenseAction::Deactivated))
    }

    pub fn statistic_row_added(row: &StatisticRow) -> Self {
        Self::StatisticRowAdded(StatisticRowEventData {
            row: row.clone(),
            action: StatisticRowAction::Added,
        })
    }

    pub fn tenant_created(tenant: &Tenant) -> Self {
        Self::TenantCreated(TenantEventData::new(tenant, TenantAction::Created))
    }

    pub fn tenant_updated(tenant: &Tenant) -> Self {
        Self::TenantUpdated(TenantEventData::new(tenant, TenantAction::Updated))
    }

    pub fn tenant_deleted(tenant: &Tenant) -> Self {
        Self::TenantDeleted(TenantEventData::new(tenant, TenantAction::Deleted))
    }

    pub fn user_created(user: &User) -> Self {
        Self::UserCreated(UserEventData {
            user: user.clone(),
            action: UserAction::Created,
        })
    }

    pub fn user_updated(user: &User) -> Self {
        Self::UserUpdated(UserEventData {
            user: user.clone(),
            action: UserAction::Updated,
        })
    }
}

// Accessors
impl LicensingEvent {
    /// Returns the subdivision the event concerns, if any.
    pub fn subdivision_id(&self) -> Option<SubdivisionId> {
        match self {
            LicensingEvent::SubdivisionCreated(data)
            | LicensingEvent::SubdivisionUpdated(data)
            | LicensingEvent::SubdivisionDeleted(data)
            | LicensingEvent::SubdivisionLicenseExpired(data) => Some(data.id),
            LicensingEvent::LicenseCreated(data)
            | LicensingEvent::LicenseUpdated(data)
            | LicensingEvent::LicenseDeleted(data)
            | LicensingEvent::LicenseActivated(data)
            | LicensingEvent::LicenseDeactivated(data) => Some(data.license.subdivision_id()),
            LicensingEvent::StatisticRowAdded(data) => Some(data.row.subdivision_id()),
            LicensingEvent::UserCreated(data) | LicensingEvent::UserUpdated(data) => {
                data.user.subdivision_id()
            }
            LicensingEvent::TenantCreated(_)
            | LicensingEvent::TenantUpdated(_)
            | LicensingEvent::TenantDeleted(_) => None,
        }
    }

    /// Returns the tenant the event concerns, if it names one directly.
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            LicensingEvent::SubdivisionCreated(data)
            | LicensingEvent::SubdivisionUpdated(data)
            | LicensingEvent::SubdivisionDeleted(data)
            | LicensingEvent::SubdivisionLicenseExpired(data) => Some(data.tenant_id),
            LicensingEvent::TenantCreated(data)
            | LicensingEvent::TenantUpdated(data)
            | LicensingEvent::TenantDeleted(data) => Some(data.id),
            LicensingEvent::UserCreated(data) | LicensingEvent::UserUpdated(data) => {
                data.user.tenant_id()
            }
            _ => None,
        }
    }
}

/// Action tag of license events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseAction {
    Created,
    Updated,
    Deleted,
    Activated,
    Deactivated,
}

impl LicenseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseAction::Created => "CREATED",
            LicenseAction::Updated => "UPDATED",
            LicenseAction::Deleted => "DELETED",
            LicenseAction::Activated => "ACTIVATED",
            LicenseAction::Deactivated => "DEACTIVATED",
        }
    }
}

/// Action tag of subdivision events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubdivisionAction {
    Created,
    Updated,
    Deleted,
    LicenseAdded,
    LicenseExpired,
}

impl SubdivisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubdivisionAction::Created => "CREATED",
            SubdivisionAction::Updated => "UPDATED",
            SubdivisionAction::Deleted => "DELETED",
            SubdivisionAction::LicenseAdded => "LICENSE_ADDED",
            SubdivisionAction::LicenseExpired => "LICENSE_EXPIRED",
        }
    }
}

/// Action tag of tenant events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantAction {
    Created,
    Updated,
    Deleted,
    SubdivisionAdded,
    LicenseAdded,
}

impl TenantAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantAction::Created => "CREATED",
            TenantAction::Updated => "UPDATED",
            TenantAction::Deleted => "DELETED",
            TenantAction::SubdivisionAdded => "SUBDIVISION_ADDED",
            TenantAction::LicenseAdded => "LICENSE_ADDED",
        }
    }
}

/// Action tag of user events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    Created,
    Updated,
    Deleted,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Created => "CREATED",
            UserAction::Updated => "UPDATED",
            UserAction::Deleted => "DELETED",
        }
    }
}

/// Action tag of statistic row events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatisticRowAction {
    Added,
}

impl StatisticRowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticRowAction::Added => "ADDED",
        }
    }
}

/// Subdivision snapshot without its licenses and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionEventData {
    pub id: SubdivisionId,
    pub name: String,
    pub location: String,
    pub tenant_id: TenantId,
    pub link_to_subdivision_processing_domain: Option<String>,
    pub work_status: WorkStatus,
    pub action: SubdivisionAction,
}

impl SubdivisionEventData {
    fn new(subdivision: &Subdivision, action: SubdivisionAction) -> Self {
        Self {
            id: subdivision.id(),
            name: subdivision.name().to_owned(),
            location: subdivision.location().to_owned(),
            tenant_id: subdivision.tenant_id(),
            link_to_subdivision_processing_domain: subdivision
                .link_to_processing_domain()
                .map(str::to_owned),
            work_status: subdivision.work_status(),
            action,
        }
    }
}

/// Full license snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseEventData {
    #[serde(flatten)]
    pub license: License,
    pub action: LicenseAction,
}

impl LicenseEventData {
    fn new(license: &License, action: LicenseAction) -> Self {
        Self {
            license: license.clone(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticRowEventData {
    #[serde(flatten)]
    pub row: StatisticRow,
    pub action: StatisticRowAction,
}

/// Tenant snapshot without its users and subdivisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantEventData {
    pub id: TenantId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub action: TenantAction,
}

impl TenantEventData {
    fn new(tenant: &Tenant, action: TenantAction) -> Self {
        Self {
            id: tenant.id(),
            name: tenant.name().to_owned(),
            address: tenant.address().to_owned(),
            email: tenant.email().to_owned(),
            phone: tenant.phone().to_owned(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEventData {
    #[serde(flatten)]
    pub user: User,
    pub action: UserAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::LicenseType;

    #[test]
    fn every_kind_is_listed_once() {
        let mut names: Vec<_> = EventKind::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn license_event_carries_snapshot_and_action() {
        let license = License::make("pro", "", LicenseType::ByCount, SubdivisionId::new(), 10);
        let event = LicensingEvent::license_deactivated(&license);

        assert_eq!(event.event_type(), "LicenseDeactivated");
        assert_eq!(event.action(), "DEACTIVATED");
        assert_eq!(event.aggregate_type(), "License");
        assert_eq!(event.subdivision_id(), Some(license.subdivision_id()));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LicenseDeactivated");
        assert_eq!(json["data"]["action"], "DEACTIVATED");
        assert_eq!(json["data"]["name"], "pro");
        assert_eq!(json["data"]["count_requests"], 10);
    }

    #[test]
    fn events_deserialize_from_wire_form() {
        let row = StatisticRow::make(3, SubdivisionId::new());
        let event = LicensingEvent::statistic_row_added(&row);

        let json = serde_json::to_string(&event).unwrap();
        let parsed: LicensingEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, event);
        assert_eq!(parsed.action(), "ADDED");
    }
}
