//! Event handlers: outbound publishing, read models and user enrichment.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, LicensingEvent};
use messagebus::{BusError, Dependencies, EventHandler, Inject};
use projections::ProjectionProcessor;

use crate::adapters::{EventPublisher, OutboundMessage, PublisherConfig, UserDirectory};
use crate::bootstrap::Licensing;
use crate::error::Result;
use crate::services::{Events, UserService};

/// Hands every event to the outbound broker.
pub struct OutboundPublisher {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl Inject for OutboundPublisher {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self {
            publisher: dependencies.resolve::<Arc<dyn EventPublisher>>()?,
            topic: dependencies.resolve::<PublisherConfig>()?.topic,
        })
    }
}

#[async_trait]
impl EventHandler<Licensing> for OutboundPublisher {
    async fn handle(&self, event: &LicensingEvent, _events: &mut Events) -> Result<()> {
        let message = OutboundMessage::from_event(self.topic.as_str(), event)?;
        tracing::debug!(
            key = %message.key,
            type_name = %message.type_name,
            action = message.action,
            "publishing event"
        );
        self.publisher.publish(message).await?;
        metrics::counter!("licensing_events_published").increment(1);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "OutboundPublisher"
    }
}

/// Feeds every event to the read models.
pub struct ProjectionHandler {
    processor: Arc<ProjectionProcessor>,
}

impl Inject for ProjectionHandler {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self {
            processor: dependencies.resolve::<Arc<ProjectionProcessor>>()?,
        })
    }
}

#[async_trait]
impl EventHandler<Licensing> for ProjectionHandler {
    async fn handle(&self, event: &LicensingEvent, _events: &mut Events) -> Result<()> {
        self.processor.process_event(event).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ProjectionHandler"
    }
}

/// Completes newly created users with contacts from the user directory.
pub struct UserEnrichmentHandler {
    directory: Arc<dyn UserDirectory>,
    users: UserService,
}

impl Inject for UserEnrichmentHandler {
    fn inject(dependencies: &Dependencies) -> std::result::Result<Self, BusError> {
        Ok(Self {
            directory: dependencies.resolve::<Arc<dyn UserDirectory>>()?,
            users: UserService::inject(dependencies)?,
        })
    }
}

#[async_trait]
impl EventHandler<Licensing> for UserEnrichmentHandler {
    async fn handle(&self, event: &LicensingEvent, events: &mut Events) -> Result<()> {
        let LicensingEvent::UserCreated(data) = event else {
            tracing::debug!(event_type = event.event_type(), "not a user creation, skipping");
            return Ok(());
        };

        let user_id = data.user.user_id();
        match self.directory.lookup(user_id).await? {
            Some(contacts) => {
                self.users.update_contacts(user_id, contacts, events).await?;
            }
            None => tracing::debug!(%user_id, "user unknown to directory"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "UserEnrichmentHandler"
    }
}
