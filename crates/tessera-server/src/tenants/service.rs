//! Tenant service: cache-aside reads over the store of record, and
//! mutations that invalidate through the coordinator before reporting
//! success.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use tessera_cache::{CacheBackend, InvalidationCoordinator, keys};
use tessera_core::{NewTenant, Tenant};
use tessera_storage::TenantStore;

use crate::api::ApiError;

#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn TenantStore>,
    cache: CacheBackend,
    coordinator: InvalidationCoordinator,
    ttl: Duration,
}

impl TenantService {
    pub fn new(store: Arc<dyn TenantStore>, cache: CacheBackend, ttl: Duration) -> Self {
        let coordinator = InvalidationCoordinator::new(cache.clone());
        Self {
            store,
            cache,
            coordinator,
            ttl,
        }
    }

    /// Lists all tenants, cache-aside under `tenants:all`.
    pub async fn list(&self) -> Result<Vec<Tenant>, ApiError> {
        if let Some(bytes) = self.cache.get(keys::TENANTS_ALL).await {
            match serde_json::from_slice::<Vec<Tenant>>(&bytes) {
                Ok(tenants) => return Ok(tenants),
                Err(e) => {
                    // Corrupt listing entry. Drop it and fall through to the
                    // store; the delete is best-effort here.
                    tracing::warn!(error = %e, "corrupt tenant listing in cache, refetching");
                    let _ = self.cache.delete(&[keys::TENANTS_ALL.to_string()]).await;
                }
            }
        }

        let tenants = self.store.find_all().await?;
        if let Ok(bytes) = serde_json::to_vec(&tenants) {
            self.cache.set(keys::TENANTS_ALL, bytes, self.ttl).await;
        }
        Ok(tenants)
    }

    /// Fetches one tenant, cache-aside under `tenant:<id>`.
    ///
    /// Absent tenants are never cached, so a tenant created moments later
    /// under the same id cannot be shadowed by a stale negative entry.
    pub async fn get(&self, id: Uuid) -> Result<Tenant, ApiError> {
        let key = keys::tenant(id);
        if let Some(bytes) = self.cache.get(&key).await {
            match serde_json::from_slice::<Tenant>(&bytes) {
                Ok(tenant) => return Ok(tenant),
                Err(e) => {
                    tracing::warn!(tenant_id = %id, error = %e, "corrupt tenant snapshot in cache, refetching");
                    let _ = self.cache.delete(&[key.clone()]).await;
                }
            }
        }

        let tenant = self.store.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        if let Ok(bytes) = serde_json::to_vec(&tenant) {
            self.cache.set(&key, bytes, self.ttl).await;
        }
        Ok(tenant)
    }

    /// Creates a tenant and invalidates the listing.
    ///
    /// The invalidation is awaited before success is reported; only the
    /// `tenants:all` entry can be stale after an insert.
    pub async fn create(&self, name: &str) -> Result<Tenant, ApiError> {
        let new = NewTenant::with_name(name)?;
        let tenant = self.store.insert(new).await?;
        self.coordinator.on_tenant_created().await?;
        Ok(tenant)
    }

    /// Deletes a tenant and sweeps every cache family that references it.
    ///
    /// Returns [`ApiError::NotFound`] if no such tenant exists. The cache
    /// sweep is fail-closed: a failed invalidation surfaces as an error
    /// even though the row is already gone, so the caller retries and the
    /// stale credential entry does not outlive the tenant silently.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        // Snapshot first: the apikey cache entry is keyed by the credential,
        // which is unrecoverable after the row is gone.
        let tenant = self.store.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

        let deleted = self.store.delete_by_id(id).await?;
        if !deleted {
            // Lost a race with a concurrent delete. The winner runs the
            // sweep with the same snapshot.
            return Err(ApiError::NotFound);
        }

        self.coordinator.on_tenant_deleted(&tenant).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_storage::MemoryTenantStore;

    fn service() -> (TenantService, Arc<MemoryTenantStore>, CacheBackend) {
        let store = Arc::new(MemoryTenantStore::new());
        let cache = CacheBackend::new_memory();
        let service = TenantService::new(store.clone(), cache.clone(), Duration::from_secs(60));
        (service, store, cache)
    }

    #[tokio::test]
    async fn create_then_get_and_list() {
        let (service, _, _) = service();

        let created = service.create("Acme").await.unwrap();
        assert_eq!(created.api_key.len(), 64);

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let listed = service.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn create_rejects_bad_names() {
        let (service, _, _) = service();
        let err = service.create("ab").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (service, _, _) = service();
        service.create("Acme").await.unwrap();
        let err = service.create("Acme").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn listing_reflects_creates_immediately() {
        let (service, _, _) = service();

        service.create("Acme").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        // A second create must not serve the listing cached above.
        service.create("Globex").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_of_absent_tenant_is_not_cached() {
        let (service, _, cache) = service();
        let id = Uuid::new_v4();

        assert!(matches!(
            service.get(id).await.unwrap_err(),
            ApiError::NotFound
        ));
        assert_eq!(cache.len(), Some(0));
    }

    #[tokio::test]
    async fn get_serves_from_cache_after_first_read() {
        let (service, store, _) = service();
        let created = service.create("Acme").await.unwrap();

        // Warm the snapshot, then take the store away.
        service.get(created.id).await.unwrap();
        store.set_unavailable(true);

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn delete_removes_row_and_cache_entries() {
        let (service, _, cache) = service();
        let created = service.create("Acme").await.unwrap();

        // Warm the caches the delete must sweep.
        service.get(created.id).await.unwrap();
        service.list().await.unwrap();

        service.delete(created.id).await.unwrap();

        assert!(cache.get(&keys::tenant(created.id)).await.is_none());
        assert!(cache.get(keys::TENANTS_ALL).await.is_none());
        assert!(matches!(
            service.get(created.id).await.unwrap_err(),
            ApiError::NotFound
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_delete_reports_not_found() {
        let (service, _, _) = service();
        let created = service.create("Acme").await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.delete(created.id).await.unwrap_err(),
            ApiError::NotFound
        ));
    }

    #[tokio::test]
    async fn failed_invalidation_fails_the_delete() {
        let (service, _, cache) = service();
        let created = service.create("Acme").await.unwrap();

        // The row delete succeeds but the cache sweep cannot run; the
        // delete must not report success with the stale entries intact.
        cache.set_unavailable(true);
        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_internal() {
        let (service, store, _) = service();
        store.set_unavailable(true);

        assert!(matches!(
            service.list().await.unwrap_err(),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            service.create("Acme").await.unwrap_err(),
            ApiError::Internal(_)
        ));
    }
}
