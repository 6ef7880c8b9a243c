use async_trait::async_trait;

use crate::{Result, SubdivisionRepository, TenantRepository, UserRepository};

/// A transactional scope over the repositories.
///
/// Nothing written through the repositories is visible outside the unit of
/// work until [`UnitOfWork::commit`] succeeds. Dropping it without
/// committing discards every change.
#[async_trait]
pub trait UnitOfWork: Send {
    fn subdivisions(&mut self) -> &mut dyn SubdivisionRepository;

    fn tenants(&mut self) -> &mut dyn TenantRepository;

    fn users(&mut self) -> &mut dyn UserRepository;

    /// Publishes the changes atomically.
    async fn commit(&mut self) -> Result<()>;
}

/// Opens units of work.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}
