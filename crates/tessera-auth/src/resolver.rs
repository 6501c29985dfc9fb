//! Cache-aside identity resolution.

use std::sync::Arc;
use std::time::Duration;

use tessera_cache::{CacheBackend, keys};
use tessera_core::Tenant;
use tessera_storage::{StorageError, TenantStore};

/// The resolver's categorical answer about a presented credential.
///
/// Computed per request, never persisted. Infrastructure failure is the
/// `Err` arm of [`IdentityResolver::resolve`], deliberately not a variant
/// here, so a caller cannot pattern-match a backend outage into an auth
/// refusal.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The key maps to an active tenant.
    Active(Tenant),
    /// The key maps to a tenant that has been deactivated.
    Inactive(Tenant),
    /// No tenant owns the key.
    NotFound,
}

impl Verdict {
    fn from_snapshot(tenant: Tenant) -> Self {
        if tenant.active {
            Self::Active(tenant)
        } else {
            Self::Inactive(tenant)
        }
    }
}

/// Resolves API keys to tenant identity verdicts.
///
/// Reads prefer the `apikey:<key>` cache entry; on a miss the store of
/// record is queried exactly once and the snapshot written back with the
/// standard TTL. Per resolution: at most one store read, at most one cache
/// write.
pub struct IdentityResolver {
    store: Arc<dyn TenantStore>,
    cache: CacheBackend,
    ttl: Duration,
}

impl IdentityResolver {
    /// Creates a resolver with the standard snapshot TTL.
    pub fn new(store: Arc<dyn TenantStore>, cache: CacheBackend) -> Self {
        Self::with_ttl(store, cache, keys::DEFAULT_TTL)
    }

    /// Creates a resolver with an explicit snapshot TTL.
    pub fn with_ttl(store: Arc<dyn TenantStore>, cache: CacheBackend, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Resolves an API key to a verdict.
    ///
    /// Callers must reject empty input before invoking this ("no credential
    /// presented" is a distinct condition owned by the extractor).
    ///
    /// # Errors
    ///
    /// Propagates store-of-record failures during a cache miss. Cache
    /// failures never surface: an unreadable cache degrades to a store
    /// read, and a failed write-back only costs the next request a miss.
    pub async fn resolve(&self, api_key: &str) -> Result<Verdict, StorageError> {
        debug_assert!(!api_key.is_empty(), "empty key must be rejected upstream");

        let cache_key = keys::api_key(api_key);

        if let Some(bytes) = self.cache.get(&cache_key).await {
            match serde_json::from_slice::<Tenant>(&bytes) {
                Ok(tenant) => {
                    tracing::debug!(tenant_id = %tenant.id, "tenant resolved from cache");
                    return Ok(Verdict::from_snapshot(tenant));
                }
                Err(e) => {
                    // Corrupt snapshot: drop it and fall through to the store.
                    tracing::warn!(error = %e, "undecodable cached snapshot, discarding");
                    if let Err(e) = self.cache.delete(std::slice::from_ref(&cache_key)).await {
                        tracing::warn!(error = %e, "failed to discard corrupt cache entry");
                    }
                }
            }
        }

        let Some(tenant) = self.store.find_by_api_key(api_key).await? else {
            // Never cache the negative result: a `NotFound` entry per guessed
            // key would both poison later registrations of that key and let
            // key-guessing grow the cache without bound.
            return Ok(Verdict::NotFound);
        };

        match serde_json::to_vec(&tenant) {
            Ok(snapshot) => self.cache.set(&cache_key, snapshot, self.ttl).await,
            Err(e) => tracing::warn!(error = %e, "failed to serialize tenant snapshot"),
        }

        tracing::debug!(tenant_id = %tenant.id, "tenant resolved from store of record");
        Ok(Verdict::from_snapshot(tenant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::NewTenant;
    use tessera_storage::MemoryTenantStore;

    struct Fixture {
        store: Arc<MemoryTenantStore>,
        cache: CacheBackend,
        resolver: IdentityResolver,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryTenantStore::new());
        let cache = CacheBackend::new_memory();
        let resolver = IdentityResolver::new(store.clone(), cache.clone());
        Fixture {
            store,
            cache,
            resolver,
        }
    }

    async fn seed_tenant(store: &MemoryTenantStore, name: &str, active: bool) -> Tenant {
        let mut new = NewTenant::with_name(name).unwrap();
        new.active = active;
        store.insert(new).await.unwrap()
    }

    #[tokio::test]
    async fn active_tenant_resolves_cold_and_warm() {
        let f = fixture();
        let tenant = seed_tenant(&f.store, "Acme", true).await;

        // Cold: goes to the store and populates the cache.
        let verdict = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(verdict, Verdict::Active(tenant.clone()));
        assert!(f.cache.get(&keys::api_key(&tenant.api_key)).await.is_some());

        // Warm: served from cache even if the store goes away.
        f.store.set_unavailable(true);
        let verdict = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(verdict, Verdict::Active(tenant));
    }

    #[tokio::test]
    async fn inactive_tenant_never_resolves_active() {
        let f = fixture();
        let tenant = seed_tenant(&f.store, "Dormant Co", false).await;

        // Cold and warm paths both yield Inactive.
        let cold = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(cold, Verdict::Inactive(tenant.clone()));
        let warm = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(warm, Verdict::Inactive(tenant));
    }

    #[tokio::test]
    async fn unknown_key_is_not_found_and_not_cached() {
        let f = fixture();

        let verdict = f.resolver.resolve("0123abcd").await.unwrap();
        assert_eq!(verdict, Verdict::NotFound);
        assert!(f.cache.get(&keys::api_key("0123abcd")).await.is_none());
        assert_eq!(f.cache.len(), Some(0));
    }

    #[tokio::test]
    async fn store_outage_on_miss_is_an_error_not_a_verdict() {
        let f = fixture();
        f.store.set_unavailable(true);

        let err = f.resolver.resolve("whatever").await.unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn cache_hit_skips_the_store() {
        let f = fixture();
        let tenant = seed_tenant(&f.store, "Acme", true).await;

        // Warm the cache, then delete the row under it. Until invalidation
        // or TTL expiry the cached snapshot still answers — the accepted
        // bounded staleness of cache-aside.
        f.resolver.resolve(&tenant.api_key).await.unwrap();
        f.store.delete_by_id(tenant.id).await.unwrap();

        let verdict = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(verdict, Verdict::Active(tenant));
    }

    #[tokio::test]
    async fn corrupt_cache_entry_falls_back_to_store() {
        let f = fixture();
        let tenant = seed_tenant(&f.store, "Acme", true).await;

        f.cache
            .set(
                &keys::api_key(&tenant.api_key),
                b"not json".to_vec(),
                Duration::from_secs(60),
            )
            .await;

        let verdict = f.resolver.resolve(&tenant.api_key).await.unwrap();
        assert_eq!(verdict, Verdict::Active(tenant.clone()));

        // The corrupt entry was replaced by a valid snapshot.
        let bytes = f
            .cache
            .get(&keys::api_key(&tenant.api_key))
            .await
            .unwrap();
        let cached: Tenant = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cached, tenant);
    }
}
