//! The projection contract and its read position.

use async_trait::async_trait;
use domain::LicensingEvent;

use crate::Result;

/// How far a projection has read the licensing event stream.
///
/// Every delivered event is `seen`; only the ones that changed the read
/// model count as `applied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionPosition {
    pub seen: u64,
    pub applied: u64,
}

impl ProjectionPosition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Position after one more delivered event.
    pub fn next(self, applied: bool) -> Self {
        Self {
            seen: self.seen + 1,
            applied: self.applied + u64::from(applied),
        }
    }

    /// Delivered events the projection had no use for.
    pub fn skipped(&self) -> u64 {
        self.seen - self.applied
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seen {}, applied {}", self.seen, self.applied)
    }
}

/// Folds licensing events into a read model.
///
/// The message bus delivers every event to every projection; a projection
/// ignores what it does not track.
#[async_trait]
pub trait Projection: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &LicensingEvent) -> Result<()>;

    async fn position(&self) -> ProjectionPosition;

    /// Empties the read model and rewinds the position.
    async fn reset(&self) -> Result<()>;
}
