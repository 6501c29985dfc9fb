//! The store-of-record contract consumed by the resolver and HTTP layer.

use async_trait::async_trait;
use tessera_core::{NewTenant, Tenant};
use uuid::Uuid;

use crate::error::StorageResult;

/// Authoritative persistence for tenant records.
///
/// All reads return plain [`Tenant`] snapshots; implementations must not
/// leak backend-specific row types. Every method performs exactly one
/// backend round-trip.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Finds the tenant owning `api_key`, if any.
    ///
    /// This is the hot path behind authentication cache misses.
    async fn find_by_api_key(&self, api_key: &str) -> StorageResult<Option<Tenant>>;

    /// Finds a tenant by id.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Tenant>>;

    /// Returns all tenants, ordered by creation time.
    async fn find_all(&self) -> StorageResult<Vec<Tenant>>;

    /// Inserts a new tenant and returns the persisted snapshot
    /// (with backend-assigned timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::Conflict`] if the name or API key is
    /// already taken.
    async fn insert(&self, tenant: NewTenant) -> StorageResult<Tenant>;

    /// Deletes a tenant row. Returns `false` if no row existed.
    async fn delete_by_id(&self, id: Uuid) -> StorageResult<bool>;
}
