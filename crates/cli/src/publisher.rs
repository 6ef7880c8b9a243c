//! Outbound publisher that writes messages to the log.

use async_trait::async_trait;
use licensing::{EventPublisher, OutboundMessage, Result};

/// Logs every outbound message instead of sending it to a broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<()> {
        tracing::info!(
            key = %message.key,
            topic = %message.topic,
            type_name = %message.type_name,
            event_type = message.event_type,
            action = message.action,
            payload = %message.payload,
            "outbound message"
        );
        Ok(())
    }
}
