//! User use cases.

use std::sync::Arc;

use common::UserId;
use domain::{CreateUser, DemoteUser, DomainError, LicensingEvent, PromoteUser, User};
use messagebus::{BusError, Dependencies, Inject};
use storage::UnitOfWorkFactory;

use super::Events;
use crate::adapters::UserContacts;
use crate::error::Result;

/// Use cases on users.
#[derive(Clone)]
pub struct UserService {
    uow: Arc<dyn UnitOfWorkFactory>,
}

impl UserService {
    pub fn new(uow: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow }
    }

    // Query methods

    pub async fn get_user(&self, user_id: UserId) -> Result<User> {
        let mut uow = self.uow.begin().await?;
        let user = uow
            .users()
            .get(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        Ok(user)
    }

    // Command methods

    /// Registers a user that belongs to no tenant yet.
    #[tracing::instrument(skip(self, events), fields(user_id = %cmd.user_id))]
    pub async fn create_user(&self, cmd: CreateUser, events: &mut Events) -> Result<User> {
        let mut uow = self.uow.begin().await?;
        let user = uow.users().add(User::make(cmd.user_id)).await?;
        uow.commit().await?;

        events.infra.add_event(LicensingEvent::user_created(&user));
        Ok(user)
    }

    #[tracing::instrument(skip(self, events), fields(user_id = %cmd.user_id))]
    pub async fn promote_user(&self, cmd: PromoteUser, events: &mut Events) -> Result<User> {
        self.modify(cmd.user_id, events, User::make_super_admin).await
    }

    #[tracing::instrument(skip(self, events), fields(user_id = %cmd.user_id))]
    pub async fn demote_user(&self, cmd: DemoteUser, events: &mut Events) -> Result<User> {
        self.modify(cmd.user_id, events, User::demote_from_super_admin)
            .await
    }

    /// Stores contact details fetched from the user directory.
    #[tracing::instrument(skip(self, contacts, events))]
    pub async fn update_contacts(
        &self,
        user_id: UserId,
        contacts: UserContacts,
        events: &mut Events,
    ) -> Result<User> {
        self.modify(user_id, events, |user| {
            user.set_contacts(contacts.email, contacts.chat_id)
        })
        .await
    }

    async fn modify(
        &self,
        user_id: UserId,
        events: &mut Events,
        change: impl FnOnce(&mut User) + Send,
    ) -> Result<User> {
        let mut uow = self.uow.begin().await?;
        let mut user = uow
            .users()
            .get(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        change(&mut user);
        let user = uow.users().save(user).await?;
        uow.commit().await?;

        events.infra.add_event(LicensingEvent::user_updated(&user));
        Ok(user)
    }
}

impl Inject for UserService {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self::new(dependencies.resolve::<Arc<dyn UnitOfWorkFactory>>()?))
    }
}
