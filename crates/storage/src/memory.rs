//! In-memory storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{StatisticRowId, SubdivisionId, TenantId, UserId};
use domain::{StatisticRow, Subdivision, Tenant, User};
use tokio::sync::RwLock;

use crate::{
    Result, StorageError, SubdivisionRepository, TenantRepository, UnitOfWork,
    UnitOfWorkFactory, UserRepository,
};

#[derive(Debug, Clone, Default)]
struct Records {
    subdivisions: HashMap<SubdivisionId, Subdivision>,
    /// Tenants are kept without their subdivisions.
    tenants: HashMap<TenantId, Tenant>,
    users: HashMap<UserId, User>,
}

#[derive(Debug, Default)]
struct Committed {
    revision: u64,
    records: Records,
}

/// In-memory store with transactional units of work.
///
/// Every unit of work stages its changes on a private copy of the committed
/// records. Committing publishes the copy if no other unit of work committed
/// in between, and fails with [`StorageError::ConcurrencyConflict`]
/// otherwise.
///
/// Opening a unit of work clones every committed record, statistic rows
/// included, so its cost grows with the stored history. Suited to tests and
/// the single-process CLI, not to long-lived stores.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    committed: Arc<RwLock<Committed>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of commits published so far.
    pub async fn revision(&self) -> u64 {
        self.committed.read().await.revision
    }

    /// Opens a unit of work on the current committed state.
    pub async fn unit_of_work(&self) -> InMemoryUnitOfWork {
        let committed = self.committed.read().await;
        InMemoryUnitOfWork {
            store: Arc::clone(&self.committed),
            base_revision: committed.revision,
            staging: Staging {
                records: committed.records.clone(),
                dirty: false,
            },
        }
    }

    /// Returns the committed subdivision with the given id.
    pub async fn subdivision(&self, id: SubdivisionId) -> Option<Subdivision> {
        self.committed.read().await.records.subdivisions.get(&id).cloned()
    }

    /// Returns the committed tenant with its subdivisions attached.
    pub async fn tenant(&self, id: TenantId) -> Option<Tenant> {
        let committed = self.committed.read().await;
        committed.records.tenant_with_subdivisions(id)
    }

    /// Returns the committed user with the given id.
    pub async fn user(&self, user_id: UserId) -> Option<User> {
        self.committed.read().await.records.users.get(&user_id).cloned()
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(self.unit_of_work().await))
    }
}

/// Unit of work over an [`InMemoryStore`].
pub struct InMemoryUnitOfWork {
    store: Arc<RwLock<Committed>>,
    base_revision: u64,
    staging: Staging,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn subdivisions(&mut self) -> &mut dyn SubdivisionRepository {
        &mut self.staging
    }

    fn tenants(&mut self) -> &mut dyn TenantRepository {
        &mut self.staging
    }

    fn users(&mut self) -> &mut dyn UserRepository {
        &mut self.staging
    }

    async fn commit(&mut self) -> Result<()> {
        if !self.staging.dirty {
            return Ok(());
        }

        let mut committed = self.store.write().await;
        if committed.revision != self.base_revision {
            metrics::counter!("storage_commit_conflicts").increment(1);
            return Err(StorageError::ConcurrencyConflict {
                expected: self.base_revision,
                actual: committed.revision,
            });
        }

        committed.records = self.staging.records.clone();
        committed.revision += 1;
        self.base_revision = committed.revision;
        self.staging.dirty = false;

        metrics::counter!("storage_commits").increment(1);
        tracing::debug!(revision = committed.revision, "unit of work committed");
        Ok(())
    }
}

/// Staged copy of the records that the repositories read and write.
#[derive(Debug)]
struct Staging {
    records: Records,
    dirty: bool,
}

impl Records {
    fn subdivisions_of(&self, tenant_id: TenantId) -> Vec<Subdivision> {
        let mut subdivisions: Vec<_> = self
            .subdivisions
            .values()
            .filter(|subdivision| subdivision.tenant_id() == tenant_id)
            .cloned()
            .collect();
        subdivisions.sort_by_key(Subdivision::id);
        subdivisions
    }

    fn tenant_with_subdivisions(&self, id: TenantId) -> Option<Tenant> {
        let mut tenant = self.tenants.get(&id)?.clone();
        tenant.attach_subdivisions(self.subdivisions_of(id));
        Some(tenant)
    }

    fn store_tenant(&mut self, mut tenant: Tenant) -> Tenant {
        let id = tenant.id();
        tenant.detach_subdivisions();
        for user in tenant.users() {
            self.users.insert(user.user_id(), user.clone());
        }

        let mut stored = tenant.clone();
        self.tenants.insert(id, tenant);
        stored.attach_subdivisions(self.subdivisions_of(id));
        stored
    }

    fn store_subdivision(&mut self, subdivision: Subdivision) -> Subdivision {
        let stored = with_row_ids(subdivision);
        self.subdivisions.insert(stored.id(), stored.clone());
        stored
    }

    fn store_user(&mut self, user: User) -> User {
        if let Some(tenant) = user
            .tenant_id()
            .and_then(|tenant_id| self.tenants.get_mut(&tenant_id))
        {
            tenant.add_user(user.clone());
        }
        self.users.insert(user.user_id(), user.clone());
        user
    }
}

/// Gives every unsaved statistic row a storage id.
fn with_row_ids(subdivision: Subdivision) -> Subdivision {
    if subdivision.statistics().iter().all(|row| row.id().is_some()) {
        return subdivision;
    }

    let statistics = subdivision
        .statistics()
        .iter()
        .map(|row| match row.id() {
            Some(_) => row.clone(),
            None => StatisticRow::make_from_persistence(
                StatisticRowId::new(),
                row.created(),
                row.count_requests(),
                row.subdivision_id(),
            ),
        })
        .collect();

    Subdivision::make_from_persistence(
        subdivision.id(),
        subdivision.name().to_owned(),
        subdivision.location().to_owned(),
        subdivision.tenant_id(),
        subdivision.work_status(),
        subdivision.link_to_processing_domain().map(str::to_owned),
        subdivision.licenses().to_vec(),
        statistics,
    )
}

#[async_trait]
impl SubdivisionRepository for Staging {
    async fn add(&mut self, subdivision: Subdivision) -> Result<Subdivision> {
        if self.records.subdivisions.contains_key(&subdivision.id()) {
            return Err(StorageError::Duplicate {
                entity: "Subdivision",
                id: subdivision.id().to_string(),
            });
        }
        self.dirty = true;
        Ok(self.records.store_subdivision(subdivision))
    }

    async fn get(&self, id: SubdivisionId) -> Result<Option<Subdivision>> {
        Ok(self.records.subdivisions.get(&id).cloned())
    }

    async fn save(&mut self, subdivision: Subdivision) -> Result<Subdivision> {
        self.dirty = true;
        Ok(self.records.store_subdivision(subdivision))
    }

    async fn delete(&mut self, id: SubdivisionId) -> Result<Option<Subdivision>> {
        let removed = self.records.subdivisions.remove(&id);
        self.dirty |= removed.is_some();
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<Subdivision>> {
        let mut subdivisions: Vec<_> = self.records.subdivisions.values().cloned().collect();
        subdivisions.sort_by_key(Subdivision::id);
        Ok(subdivisions)
    }

    async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Subdivision>> {
        Ok(self.records.subdivisions_of(tenant_id))
    }
}

#[async_trait]
impl TenantRepository for Staging {
    async fn add(&mut self, tenant: Tenant) -> Result<Tenant> {
        if self.records.tenants.contains_key(&tenant.id()) {
            return Err(StorageError::Duplicate {
                entity: "Tenant",
                id: tenant.id().to_string(),
            });
        }
        self.dirty = true;
        Ok(self.records.store_tenant(tenant))
    }

    async fn get(&self, id: TenantId) -> Result<Option<Tenant>> {
        Ok(self.records.tenant_with_subdivisions(id))
    }

    /// Attached subdivisions are not written; they are saved through the
    /// subdivision repository.
    async fn save(&mut self, tenant: Tenant) -> Result<Tenant> {
        self.dirty = true;
        Ok(self.records.store_tenant(tenant))
    }

    async fn delete(&mut self, id: TenantId) -> Result<Option<Tenant>> {
        let Some(tenant) = self.records.tenant_with_subdivisions(id) else {
            return Ok(None);
        };

        let records = &mut self.records;
        records.tenants.remove(&id);
        records
            .subdivisions
            .retain(|_, subdivision| subdivision.tenant_id() != id);
        records.users.retain(|_, user| user.tenant_id() != Some(id));
        self.dirty = true;

        tracing::debug!(
            tenant_id = %id,
            subdivisions = tenant.subdivisions().len(),
            users = tenant.users().len(),
            "tenant deleted with its subdivisions and users"
        );
        Ok(Some(tenant))
    }

    async fn list(&self) -> Result<Vec<Tenant>> {
        let mut ids: Vec<_> = self.records.tenants.keys().copied().collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.records.tenant_with_subdivisions(id))
            .collect())
    }
}

#[async_trait]
impl UserRepository for Staging {
    async fn add(&mut self, user: User) -> Result<User> {
        if self.records.users.contains_key(&user.user_id()) {
            return Err(StorageError::Duplicate {
                entity: "User",
                id: user.user_id().to_string(),
            });
        }
        self.dirty = true;
        Ok(self.records.store_user(user))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.records.users.get(&user_id).cloned())
    }

    async fn save(&mut self, user: User) -> Result<User> {
        self.dirty = true;
        Ok(self.records.store_user(user))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<_> = self.records.users.values().cloned().collect();
        users.sort_by_key(User::user_id);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use domain::{LicensePolicy, LicenseType};

    use super::*;

    #[tokio::test]
    async fn changes_are_invisible_until_commit() {
        let store = InMemoryStore::new();
        let subdivision = Subdivision::make("North", "Oslo", TenantId::new());
        let id = subdivision.id();

        let mut uow = store.unit_of_work().await;
        uow.subdivisions().add(subdivision).await.unwrap();

        assert!(store.subdivision(id).await.is_none());
        uow.commit().await.unwrap();
        assert!(store.subdivision(id).await.is_some());
        assert_eq!(store.revision().await, 1);
    }

    #[tokio::test]
    async fn dropping_without_commit_discards_changes() {
        let store = InMemoryStore::new();
        let subdivision = Subdivision::make("North", "Oslo", TenantId::new());
        let id = subdivision.id();

        {
            let mut uow = store.unit_of_work().await;
            uow.subdivisions().add(subdivision).await.unwrap();
        }

        assert!(store.subdivision(id).await.is_none());
        assert_eq!(store.revision().await, 0);
    }

    #[tokio::test]
    async fn read_only_commit_does_not_bump_revision() {
        let store = InMemoryStore::new();
        let mut uow = store.unit_of_work().await;
        uow.subdivisions().list().await.unwrap();
        uow.commit().await.unwrap();
        assert_eq!(store.revision().await, 0);
    }

    #[tokio::test]
    async fn concurrent_commit_conflicts() {
        let store = InMemoryStore::new();
        let mut first = store.unit_of_work().await;
        let mut second = store.unit_of_work().await;

        first
            .subdivisions()
            .add(Subdivision::make("a", "a", TenantId::new()))
            .await
            .unwrap();
        second
            .subdivisions()
            .add(Subdivision::make("b", "b", TenantId::new()))
            .await
            .unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert_eq!(
            err,
            StorageError::ConcurrencyConflict {
                expected: 0,
                actual: 1
            }
        );
    }

    #[tokio::test]
    async fn save_assigns_statistic_row_ids() {
        let store = InMemoryStore::new();
        let mut subdivision = Subdivision::make("North", "Oslo", TenantId::new());
        let license_id = subdivision
            .add_license("pro", "", LicenseType::ByCount, 100, &LicensePolicy::default())
            .id();
        subdivision.activate_license(license_id).unwrap();
        subdivision
            .save_day_statistic(StatisticRow::make(1, subdivision.id()))
            .unwrap();

        let mut uow = store.unit_of_work().await;
        let stored = uow.subdivisions().save(subdivision).await.unwrap();

        assert!(stored.statistics().iter().all(|row| row.id().is_some()));
        assert!(stored.is_active());
        assert_eq!(stored.licenses().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() {
        let store = InMemoryStore::new();
        let user = User::make(UserId::new());

        let mut uow = store.unit_of_work().await;
        uow.users().add(user.clone()).await.unwrap();
        let err = uow.users().add(user).await.unwrap_err();

        assert!(matches!(err, StorageError::Duplicate { entity: "User", .. }));
    }
}
