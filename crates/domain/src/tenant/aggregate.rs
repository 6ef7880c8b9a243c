//! Tenant aggregate implementation.

use common::{TenantId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRoot;
use crate::subdivision::Subdivision;

use super::User;

/// Tenant aggregate root.
///
/// Owns its users and subdivisions. The aggregate itself does not cascade
/// deletion; removing a tenant's subdivisions and users is a storage concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    id: TenantId,
    name: String,
    address: String,
    email: String,
    phone: String,
    users: Vec<User>,
    #[serde(default)]
    subdivisions: Vec<Subdivision>,
}

impl AggregateRoot for Tenant {
    type Id = TenantId;

    fn aggregate_type() -> &'static str {
        "Tenant"
    }

    fn id(&self) -> TenantId {
        self.id
    }
}

impl Tenant {
    /// Creates a tenant together with its first user.
    pub fn make(
        user_id: UserId,
        name: impl Into<String>,
        address: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let id = TenantId::new();
        let mut user = User::make(user_id);
        user.assign_tenant(id);
        Self {
            id,
            name: name.into(),
            address: address.into(),
            email: email.into(),
            phone: phone.into(),
            users: vec![user],
            subdivisions: Vec::new(),
        }
    }

    pub fn make_from_persistence(
        id: TenantId,
        name: String,
        address: String,
        email: String,
        phone: String,
        users: Vec<User>,
        subdivisions: Vec<Subdivision>,
    ) -> Self {
        Self {
            id,
            name,
            address,
            email,
            phone,
            users,
            subdivisions,
        }
    }

    pub fn id(&self) -> TenantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn subdivisions(&self) -> &[Subdivision] {
        &self.subdivisions
    }

    pub fn update(
        &mut self,
        name: impl Into<String>,
        address: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) {
        self.name = name.into();
        self.address = address.into();
        self.email = email.into();
        self.phone = phone.into();
    }

    /// Adds a user to the tenant, or replaces the one with the same id.
    pub fn add_user(&mut self, mut user: User) {
        user.assign_tenant(self.id);
        match self
            .users
            .iter_mut()
            .find(|existing| existing.user_id() == user.user_id())
        {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Replaces the attached subdivisions with `subdivisions`.
    pub fn attach_subdivisions(&mut self, subdivisions: Vec<Subdivision>) {
        self.subdivisions = subdivisions;
    }

    /// Takes the attached subdivisions out of the tenant.
    pub fn detach_subdivisions(&mut self) -> Vec<Subdivision> {
        std::mem::take(&mut self.subdivisions)
    }
}
