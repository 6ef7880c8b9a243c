//! Outbound broker contract and an in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, LicensingEvent};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{LicensingError, Result};

/// Topic used when none is configured.
pub const DEFAULT_TOPIC: &str = "licensing";

/// Where outbound messages go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub topic: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

/// A self-describing event ready for the outbound broker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    /// Unique message key.
    pub key: Uuid,
    pub topic: String,
    /// Wire schema name, one per aggregate type, e.g. `LicenseEvent`.
    pub type_name: String,
    pub event_type: &'static str,
    pub action: &'static str,
    pub payload: serde_json::Value,
}

impl OutboundMessage {
    /// Serializes `event` into a message for `topic`.
    pub fn from_event(topic: impl Into<String>, event: &LicensingEvent) -> Result<Self> {
        Ok(Self {
            key: Uuid::new_v4(),
            topic: topic.into(),
            type_name: format!("{}Event", event.aggregate_type()),
            event_type: event.event_type(),
            action: event.action(),
            payload: serde_json::to_value(event)?,
        })
    }
}

/// Transport for outbound messages.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, message: OutboundMessage) -> Result<()>;
}

#[derive(Debug, Default)]
struct PublisherState {
    sent: Vec<OutboundMessage>,
    fail_on_publish: bool,
}

/// In-memory publisher that records every message it accepts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    state: Arc<RwLock<PublisherState>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publishes fail.
    pub async fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().await.fail_on_publish = fail;
    }

    /// Returns the accepted messages in publish order.
    pub async fn messages(&self) -> Vec<OutboundMessage> {
        self.state.read().await.sent.clone()
    }

    /// Returns the event types of the accepted messages in publish order.
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.state
            .read()
            .await
            .sent
            .iter()
            .map(|message| message.event_type)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.sent.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.sent.is_empty()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_publish {
            return Err(LicensingError::Publish(format!(
                "broker unavailable for topic {}",
                message.topic
            )));
        }
        state.sent.push(message);
        Ok(())
    }
}
