//! Delivery of events to projections.

use domain::{DomainEvent, LicensingEvent};

use crate::Result;
use crate::projection::Projection;

/// Delivers licensing events to every registered projection in order.
#[derive(Default)]
pub struct ProjectionProcessor {
    projections: Vec<Box<dyn Projection>>,
}

impl ProjectionProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a projection; it receives events from now on.
    pub fn register(&mut self, projection: Box<dyn Projection>) {
        self.projections.push(projection);
    }

    /// Builder form of [`ProjectionProcessor::register`].
    pub fn with(mut self, projection: impl Projection + 'static) -> Self {
        self.register(Box::new(projection));
        self
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Delivers a single event to all registered projections.
    #[tracing::instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn process_event(&self, event: &LicensingEvent) -> Result<()> {
        for projection in &self.projections {
            projection.handle(event).await?;
            metrics::counter!("projections_events_processed").increment(1);
        }
        Ok(())
    }

    /// Resets all projections and replays `events` into them.
    #[tracing::instrument(skip_all)]
    pub async fn rebuild_all<'a>(
        &self,
        events: impl IntoIterator<Item = &'a LicensingEvent>,
    ) -> Result<()> {
        for projection in &self.projections {
            projection.reset().await?;
        }

        let mut replayed = 0_u64;
        for event in events {
            self.process_event(event).await?;
            replayed += 1;
        }
        tracing::info!(events_processed = replayed, "rebuild complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use common::SubdivisionId;
    use domain::StatisticRow;
    use tokio::sync::RwLock;

    use super::*;
    use crate::projection::ProjectionPosition;

    /// A simple counting projection for testing.
    struct CountingProjection {
        count: Arc<RwLock<u64>>,
        position: Arc<RwLock<ProjectionPosition>>,
    }

    impl CountingProjection {
        fn new() -> Self {
            Self {
                count: Arc::new(RwLock::new(0)),
                position: Arc::new(RwLock::new(ProjectionPosition::zero())),
            }
        }
    }

    #[async_trait]
    impl Projection for CountingProjection {
        fn name(&self) -> &'static str {
            "CountingProjection"
        }

        async fn handle(&self, _event: &LicensingEvent) -> Result<()> {
            *self.count.write().await += 1;
            let mut pos = self.position.write().await;
            *pos = pos.next(true);
            Ok(())
        }

        async fn position(&self) -> ProjectionPosition {
            *self.position.read().await
        }

        async fn reset(&self) -> Result<()> {
            *self.count.write().await = 0;
            *self.position.write().await = ProjectionPosition::zero();
            Ok(())
        }
    }

    fn usage_event() -> LicensingEvent {
        LicensingEvent::statistic_row_added(&StatisticRow::make(1, SubdivisionId::new()))
    }

    #[tokio::test]
    async fn test_process_single_event() {
        let projection = CountingProjection::new();
        let count = Arc::clone(&projection.count);
        let processor = ProjectionProcessor::new().with(projection);

        processor.process_event(&usage_event()).await.unwrap();

        assert_eq!(*count.read().await, 1);
        assert_eq!(processor.projection_count(), 1);
    }

    #[tokio::test]
    async fn test_rebuild_resets_before_replay() {
        let projection = CountingProjection::new();
        let count = Arc::clone(&projection.count);
        let processor = ProjectionProcessor::new().with(projection);

        processor.process_event(&usage_event()).await.unwrap();
        let history = vec![usage_event(), usage_event(), usage_event()];
        processor.rebuild_all(&history).await.unwrap();

        assert_eq!(*count.read().await, 3);
    }
}
