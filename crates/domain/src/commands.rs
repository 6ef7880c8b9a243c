//! Licensing commands.
//!
//! Each command is a flat, immutable record. [`LicensingCommand`] is the sum
//! type the message bus routes on.

use chrono::{DateTime, Utc};
use common::{LicenseId, SubdivisionId, TenantId, UserId};
use messagebus::{MessageKind, Routable};
use serde::{Deserialize, Serialize};

use crate::value_objects::{LicenseType, WorkStatus};

/// Command to create a subdivision of an existing tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubdivision {
    pub name: String,
    pub location: String,
    pub tenant_id: TenantId,
}

impl CreateSubdivision {
    pub fn new(name: impl Into<String>, location: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            tenant_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubdivision {
    pub id: SubdivisionId,
    pub name: String,
    pub location: String,
    pub work_status: WorkStatus,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSubdivision {
    pub id: SubdivisionId,
}

/// Command to issue a new, inactive license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLicense {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub license_type: LicenseType,
    pub count_requests: u64,
    pub subdivision_id: SubdivisionId,
}

impl CreateLicense {
    pub fn new(
        subdivision_id: SubdivisionId,
        name: impl Into<String>,
        license_type: LicenseType,
        count_requests: u64,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            license_type,
            count_requests,
            subdivision_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Command to rename a license; type and cap change only when given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLicense {
    pub id: LicenseId,
    pub name: String,
    pub description: String,
    pub subdivision_id: SubdivisionId,
    #[serde(default, rename = "type")]
    pub license_type: Option<LicenseType>,
    #[serde(default)]
    pub count_requests: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLicense {
    pub id: LicenseId,
    pub subdivision_id: SubdivisionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateSubdivisionLicense {
    pub subdivision_id: SubdivisionId,
    pub license_id: LicenseId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateSubdivisionLicense {
    pub subdivision_id: SubdivisionId,
    pub license_id: LicenseId,
}

/// Command to record usage observed at `created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStatisticRow {
    pub subdivision_id: SubdivisionId,
    pub created: DateTime<Utc>,
    pub count_requests: u64,
}

impl AddStatisticRow {
    /// Usage observed now.
    pub fn now(subdivision_id: SubdivisionId, count_requests: u64) -> Self {
        Self {
            subdivision_id,
            created: Utc::now(),
            count_requests,
        }
    }
}

/// Command to create a tenant together with its first user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTenant {
    pub user_id: UserId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTenant {
    pub id: TenantId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTenant {
    pub id: TenantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUser {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteUser {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoteUser {
    pub user_id: UserId,
}

/// Every command the licensing service accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LicensingCommand {
    CreateSubdivision(CreateSubdivision),
    UpdateSubdivision(UpdateSubdivision),
    DeleteSubdivision(DeleteSubdivision),
    CreateLicense(CreateLicense),
    UpdateLicense(UpdateLicense),
    DeleteLicense(DeleteLicense),
    ActivateSubdivisionLicense(ActivateSubdivisionLicense),
    DeactivateSubdivisionLicense(DeactivateSubdivisionLicense),
    AddStatisticRow(AddStatisticRow),
    CreateTenant(CreateTenant),
    UpdateTenant(UpdateTenant),
    DeleteTenant(DeleteTenant),
    CreateUser(CreateUser),
    PromoteUser(PromoteUser),
    DemoteUser(DemoteUser),
}

/// Discriminant of [`LicensingCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    CreateSubdivision,
    UpdateSubdivision,
    DeleteSubdivision,
    CreateLicense,
    UpdateLicense,
    DeleteLicense,
    ActivateSubdivisionLicense,
    DeactivateSubdivisionLicense,
    AddStatisticRow,
    CreateTenant,
    UpdateTenant,
    DeleteTenant,
    CreateUser,
    PromoteUser,
    DemoteUser,
}

impl MessageKind for CommandKind {
    const ALL: &'static [Self] = &[
        CommandKind::CreateSubdivision,
        CommandKind::UpdateSubdivision,
        CommandKind::DeleteSubdivision,
        CommandKind::CreateLicense,
        CommandKind::UpdateLicense,
        CommandKind::DeleteLicense,
        CommandKind::ActivateSubdivisionLicense,
        CommandKind::DeactivateSubdivisionLicense,
        CommandKind::AddStatisticRow,
        CommandKind::CreateTenant,
        CommandKind::UpdateTenant,
        CommandKind::DeleteTenant,
        CommandKind::CreateUser,
        CommandKind::PromoteUser,
        CommandKind::DemoteUser,
    ];

    fn name(&self) -> &'static str {
        match self {
            CommandKind::CreateSubdivision => "CreateSubdivision",
            CommandKind::UpdateSubdivision => "UpdateSubdivision",
            CommandKind::DeleteSubdivision => "DeleteSubdivision",
            CommandKind::CreateLicense => "CreateLicense",
            CommandKind::UpdateLicense => "UpdateLicense",
            CommandKind::DeleteLicense => "DeleteLicense",
            CommandKind::ActivateSubdivisionLicense => "ActivateSubdivisionLicense",
            CommandKind::DeactivateSubdivisionLicense => "DeactivateSubdivisionLicense",
            CommandKind::AddStatisticRow => "AddStatisticRow",
            CommandKind::CreateTenant => "CreateTenant",
            CommandKind::UpdateTenant => "UpdateTenant",
            CommandKind::DeleteTenant => "DeleteTenant",
            CommandKind::CreateUser => "CreateUser",
            CommandKind::PromoteUser => "PromoteUser",
            CommandKind::DemoteUser => "DemoteUser",
        }
    }
}

impl Routable for LicensingCommand {
    type Kind = CommandKind;

    fn kind(&self) -> CommandKind {
        match self {
            LicensingCommand::CreateSubdivision(_) => CommandKind::CreateSubdivision,
            LicensingCommand::UpdateSubdivision(_) => CommandKind::UpdateSubdivision,
            LicensingCommand::DeleteSubdivision(_) => CommandKind::DeleteSubdivision,
            LicensingCommand::CreateLicense(_) => CommandKind::CreateLicense,
            LicensingCommand::UpdateLicense(_) => CommandKind::UpdateLicense,
            LicensingCommand::DeleteLicense(_) => CommandKind::DeleteLicense,
            LicensingCommand::ActivateSubdivisionLicense(_) => {
                CommandKind::ActivateSubdivisionLicense
            }
            LicensingCommand::DeactivateSubdivisionLicense(_) => {
                CommandKind::DeactivateSubdivisionLicense
            }
            LicensingCommand::AddStatisticRow(_) => CommandKind::AddStatisticRow,
            LicensingCommand::CreateTenant(_) => CommandKind::CreateTenant,
            LicensingCommand::UpdateTenant(_) => CommandKind::UpdateTenant,
            LicensingCommand::DeleteTenant(_) => CommandKind::DeleteTenant,
            LicensingCommand::CreateUser(_) => CommandKind::CreateUser,
            LicensingCommand::PromoteUser(_) => CommandKind::PromoteUser,
            LicensingCommand::DemoteUser(_) => CommandKind::DemoteUser,
        }
    }
}

macro_rules! impl_into_command {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<$name> for LicensingCommand {
                fn from(command: $name) -> Self {
                    LicensingCommand::$name(command)
                }
            }
        )*
    };
}

impl_into_command!(
    CreateSubdivision,
    UpdateSubdivision,
    DeleteSubdivision,
    CreateLicense,
    UpdateLicense,
    DeleteLicense,
    ActivateSubdivisionLicense,
    DeactivateSubdivisionLicense,
    AddStatisticRow,
    CreateTenant,
    UpdateTenant,
    DeleteTenant,
    CreateUser,
    PromoteUser,
    DemoteUser,
);
