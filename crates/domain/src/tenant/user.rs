use common::{SubdivisionId, TenantId, UserId};
use serde::{Deserialize, Serialize};

/// A member of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    user_id: UserId,
    email: Option<String>,
    chat_id: Option<String>,
    #[serde(default)]
    superadmin: bool,
    tenant_id: Option<TenantId>,
    subdivision_id: Option<SubdivisionId>,
}

impl User {
    /// Creates a regular user that belongs to nothing yet.
    pub fn make(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            chat_id: None,
            superadmin: false,
            tenant_id: None,
            subdivision_id: None,
        }
    }

    pub fn make_from_persistence(
        user_id: UserId,
        email: Option<String>,
        chat_id: Option<String>,
        superadmin: bool,
        tenant_id: Option<TenantId>,
        subdivision_id: Option<SubdivisionId>,
    ) -> Self {
        Self {
            user_id,
            email,
            chat_id,
            superadmin,
            tenant_id,
            subdivision_id,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Chat handle used for notifications.
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn is_superadmin(&self) -> bool {
        self.superadmin
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn subdivision_id(&self) -> Option<SubdivisionId> {
        self.subdivision_id
    }

    pub fn make_super_admin(&mut self) {
        self.superadmin = true;
    }

    pub fn demote_from_super_admin(&mut self) {
        self.superadmin = false;
    }

    /// Replaces the contact details.
    pub fn set_contacts(&mut self, email: Option<String>, chat_id: Option<String>) {
        self.email = email;
        self.chat_id = chat_id;
    }

    pub fn assign_tenant(&mut self, tenant_id: TenantId) {
        self.tenant_id = Some(tenant_id);
    }

    pub fn assign_subdivision(&mut self, subdivision_id: Option<SubdivisionId>) {
        self.subdivision_id = subdivision_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_and_demote() {
        let mut user = User::make(UserId::new());
        assert!(!user.is_superadmin());

        user.make_super_admin();
        assert!(user.is_superadmin());

        user.demote_from_super_admin();
        assert!(!user.is_superadmin());
    }

    #[test]
    fn superadmin_defaults_to_false_when_missing() {
        let id = UserId::new();
        let json = format!(
            r#"{{"user_id":"{id}","email":null,"chat_id":null,"tenant_id":null,"subdivision_id":null}}"#
        );
        let user: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user, User::make(id));
    }
}
