//! Usage observations.

use chrono::{DateTime, Utc};
use common::{StatisticRowId, SubdivisionId};
use serde::{Deserialize, Serialize};

/// One usage observation of a subdivision.
///
/// Rows are immutable once made. The id is absent until storage assigns one,
/// and it takes no part in equality: two rows are the same observation when
/// their timestamp, count and subdivision match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticRow {
    id: Option<StatisticRowId>,
    created: DateTime<Utc>,
    count_requests: u64,
    subdivision_id: SubdivisionId,
}

impl StatisticRow {
    /// Records `count_requests` observed now.
    pub fn make(count_requests: u64, subdivision_id: SubdivisionId) -> Self {
        Self::observed_at(Utc::now(), count_requests, subdivision_id)
    }

    /// Records `count_requests` observed at `created`.
    pub fn observed_at(
        created: DateTime<Utc>,
        count_requests: u64,
        subdivision_id: SubdivisionId,
    ) -> Self {
        Self {
            id: None,
            created,
            count_requests,
            subdivision_id,
        }
    }

    pub fn make_from_persistence(
        id: StatisticRowId,
        created: DateTime<Utc>,
        count_requests: u64,
        subdivision_id: SubdivisionId,
    ) -> Self {
        Self {
            id: Some(id),
            created,
            count_requests,
            subdivision_id,
        }
    }

    pub fn id(&self) -> Option<StatisticRowId> {
        self.id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn count_requests(&self) -> u64 {
        self.count_requests
    }

    pub fn subdivision_id(&self) -> SubdivisionId {
        self.subdivision_id
    }
}

impl PartialEq for StatisticRow {
    fn eq(&self, other: &Self) -> bool {
        self.created == other.created
            && self.count_requests == other.count_requests
            && self.subdivision_id == other.subdivision_id
    }
}

impl Eq for StatisticRow {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_storage_id() {
        let subdivision_id = SubdivisionId::new();
        let now = Utc::now();

        let fresh = StatisticRow::observed_at(now, 5, subdivision_id);
        let stored =
            StatisticRow::make_from_persistence(StatisticRowId::new(), now, 5, subdivision_id);

        assert!(fresh.id().is_none());
        assert_eq!(fresh, stored);
        assert_ne!(fresh, StatisticRow::observed_at(now, 6, subdivision_id));
    }
}
