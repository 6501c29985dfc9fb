//! Invalidation coordinator for tenant mutations.
//!
//! Every tenant write goes to the store of record first; the coordinator
//! then removes the cache families that could now be stale. Deletes here
//! are fail-closed: the mutation handler must not report success until the
//! coordinator returns `Ok`, otherwise a revoked tenant's API key could
//! keep resolving as active from a stale `apikey:` entry for up to the
//! remaining TTL.

use tessera_core::Tenant;

use crate::backend::CacheBackend;
use crate::error::CacheError;
use crate::keys;

/// Removes or refreshes cache entries when a tenant record changes.
#[derive(Clone)]
pub struct InvalidationCoordinator {
    cache: CacheBackend,
}

impl InvalidationCoordinator {
    pub fn new(cache: CacheBackend) -> Self {
        Self { cache }
    }

    /// Called after a tenant row is inserted.
    ///
    /// Only the listing is stale — nothing references the new tenant yet.
    /// `apikey:<key>` and `tenant:<id>` are populated lazily by the first
    /// read.
    pub async fn on_tenant_created(&self) -> Result<(), CacheError> {
        self.cache.delete(&[keys::TENANTS_ALL.to_string()]).await?;
        tracing::debug!("tenant listing invalidated after create");
        Ok(())
    }

    /// Called after a tenant row is deleted, before the delete reports
    /// success.
    ///
    /// Removes, in order: the id-scoped snapshot (so a concurrent reader
    /// sees "not cached" soonest), the listing, the `apikey:<key>` entry,
    /// then every derived entry under `tenant:<id>:*`. The apikey entry is
    /// keyed by credential, not id, so the wildcard sweep cannot reach it —
    /// it must be deleted explicitly from the tenant snapshot in hand.
    ///
    /// Idempotent: a second call observes already-absent keys and still
    /// succeeds.
    pub async fn on_tenant_deleted(&self, tenant: &Tenant) -> Result<(), CacheError> {
        self.cache.delete(&[keys::tenant(tenant.id)]).await?;
        self.cache.delete(&[keys::TENANTS_ALL.to_string()]).await?;
        self.cache.delete(&[keys::api_key(&tenant.api_key)]).await?;

        let derived = self
            .cache
            .keys_matching(&keys::tenant_wildcard(tenant.id))
            .await?;
        self.cache.delete(&derived).await?;

        tracing::debug!(
            tenant_id = %tenant.id,
            derived_entries = derived.len(),
            "tenant cache entries invalidated after delete"
        );
        Ok(())
    }
}
