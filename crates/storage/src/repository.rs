//! Repository contracts.
//!
//! Repositories are only reachable through an open [`UnitOfWork`]; changes
//! become visible to other units of work on commit.
//!
//! [`UnitOfWork`]: crate::UnitOfWork

use async_trait::async_trait;
use common::{SubdivisionId, TenantId, UserId};
use domain::{Subdivision, Tenant, User};

use crate::Result;

#[async_trait]
pub trait SubdivisionRepository: Send + Sync {
    /// Stores a new subdivision; fails if the id is taken.
    async fn add(&mut self, subdivision: Subdivision) -> Result<Subdivision>;

    async fn get(&self, id: SubdivisionId) -> Result<Option<Subdivision>>;

    /// Stores the subdivision as given and returns the stored form, with
    /// ids assigned to new statistic rows.
    async fn save(&mut self, subdivision: Subdivision) -> Result<Subdivision>;

    /// Removes a subdivision and returns it if it existed.
    async fn delete(&mut self, id: SubdivisionId) -> Result<Option<Subdivision>>;

    async fn list(&self) -> Result<Vec<Subdivision>>;

    async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Subdivision>>;
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Stores a new tenant and its users; fails if the id is taken.
    async fn add(&mut self, tenant: Tenant) -> Result<Tenant>;

    /// Loads a tenant with its subdivisions attached.
    async fn get(&self, id: TenantId) -> Result<Option<Tenant>>;

    async fn save(&mut self, tenant: Tenant) -> Result<Tenant>;

    /// Removes a tenant together with its subdivisions and users.
    async fn delete(&mut self, id: TenantId) -> Result<Option<Tenant>>;

    async fn list(&self) -> Result<Vec<Tenant>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user; fails if the id is taken.
    async fn add(&mut self, user: User) -> Result<User>;

    async fn get(&self, user_id: UserId) -> Result<Option<User>>;

    /// Stores the user, keeping the owning tenant's copy in step.
    async fn save(&mut self, user: User) -> Result<User>;

    async fn list(&self) -> Result<Vec<User>>;
}
