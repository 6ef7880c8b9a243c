//! Subdivision usage read model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::SubdivisionId;
use domain::LicensingEvent;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Usage recorded for one subdivision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdivisionUsage {
    /// Requests recorded over the subdivision's lifetime.
    pub total_requests: u64,
    /// Requests recorded since the latest license activation.
    pub window_requests: u64,
    pub rows: usize,
    pub last_observed: Option<DateTime<Utc>>,
    /// Number of times a submission exhausted the license in force.
    pub exhaustions: u32,
}

/// Read model view of per-subdivision usage.
#[derive(Clone)]
pub struct SubdivisionUsageView {
    usage: Arc<RwLock<HashMap<SubdivisionId, SubdivisionUsage>>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl SubdivisionUsageView {
    pub fn new() -> Self {
        Self {
            usage: Arc::new(RwLock::new(HashMap::new())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    pub async fn get(&self, subdivision_id: SubdivisionId) -> Option<SubdivisionUsage> {
        self.usage.read().await.get(&subdivision_id).cloned()
    }

    /// Total requests across all subdivisions.
    pub async fn total_requests(&self) -> u64 {
        self.usage
            .read()
            .await
            .values()
            .map(|usage| usage.total_requests)
            .sum()
    }
}

impl Default for SubdivisionUsageView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for SubdivisionUsageView {
    fn name(&self) -> &'static str {
        "SubdivisionUsageView"
    }

    async fn handle(&self, event: &LicensingEvent) -> Result<()> {
        let applied = matches!(
            event,
            LicensingEvent::StatisticRowAdded(_)
                | LicensingEvent::LicenseActivated(_)
                | LicensingEvent::SubdivisionLicenseExpired(_)
                | LicensingEvent::SubdivisionDeleted(_)
        );
        {
            let mut usage = self.usage.write().await;
            match event {
                LicensingEvent::StatisticRowAdded(data) => {
                    let row = &data.row;
                    let entry = usage.entry(row.subdivision_id()).or_default();
                    entry.total_requests += row.count_requests();
                    entry.window_requests += row.count_requests();
                    entry.rows += 1;
                    entry.last_observed = entry.last_observed.max(Some(row.created()));
                }
                LicensingEvent::LicenseActivated(data) => {
                    usage
                        .entry(data.license.subdivision_id())
                        .or_default()
                        .window_requests = 0;
                }
                LicensingEvent::SubdivisionLicenseExpired(data) => {
                    usage.entry(data.id).or_default().exhaustions += 1;
                }
                LicensingEvent::SubdivisionDeleted(data) => {
                    usage.remove(&data.id);
                }
                _ => {}
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.next(applied);
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        self.usage.write().await.clear();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for SubdivisionUsageView {
    fn name(&self) -> &'static str {
        "SubdivisionUsageView"
    }

    fn count(&self) -> usize {
        self.usage.try_read().map(|usage| usage.len()).unwrap_or(0)
    }
}
