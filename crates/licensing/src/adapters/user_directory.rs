//! Lookup of user contact details held by the user domain.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::error::Result;

/// Contact details of a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserContacts {
    pub email: Option<String>,
    pub chat_id: Option<String>,
}

impl UserContacts {
    pub fn new(email: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            chat_id: Some(chat_id.into()),
        }
    }
}

/// Source of contact details for users created in this service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the contacts of `user_id`, or `None` if the directory does not
    /// know the user.
    async fn lookup(&self, user_id: UserId) -> Result<Option<UserContacts>>;
}

/// In-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    entries: Arc<RwLock<HashMap<UserId, UserContacts>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: UserId, contacts: UserContacts) {
        self.entries.write().await.insert(user_id, contacts);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn lookup(&self, user_id: UserId) -> Result<Option<UserContacts>> {
        Ok(self.entries.read().await.get(&user_id).cloned())
    }
}
