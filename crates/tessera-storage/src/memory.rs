//! In-memory tenant store.
//!
//! Backed by a `DashMap`; used by unit and HTTP integration tests, and
//! usable as a throwaway backend for local development. Not durable.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tessera_core::{NewTenant, Tenant};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::traits::TenantStore;

/// Thread-safe in-memory [`TenantStore`].
#[derive(Default)]
pub struct MemoryTenantStore {
    tenants: DashMap<Uuid, Tenant>,
    // When set, every operation fails with a connection error. Lets tests
    // exercise the infrastructure-failure paths of the resolver.
    unavailable: AtomicBool,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates backend unavailability for tests.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::connection("store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn find_by_api_key(&self, api_key: &str) -> StorageResult<Option<Tenant>> {
        self.check_available()?;
        Ok(self
            .tenants
            .iter()
            .find(|entry| entry.api_key == api_key)
            .map(|entry| entry.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Tenant>> {
        self.check_available()?;
        Ok(self.tenants.get(&id).map(|entry| entry.clone()))
    }

    async fn find_all(&self) -> StorageResult<Vec<Tenant>> {
        self.check_available()?;
        let mut all: Vec<Tenant> = self.tenants.iter().map(|entry| entry.clone()).collect();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    async fn insert(&self, tenant: NewTenant) -> StorageResult<Tenant> {
        self.check_available()?;
        if self.tenants.iter().any(|e| e.name == tenant.name) {
            return Err(StorageError::conflict("name", tenant.name));
        }
        if self.tenants.iter().any(|e| e.api_key == tenant.api_key) {
            return Err(StorageError::conflict("api_key", tenant.api_key));
        }
        let snapshot = Tenant::from_new(tenant, OffsetDateTime::now_utc());
        self.tenants.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    async fn delete_by_id(&self, id: Uuid) -> StorageResult<bool> {
        self.check_available()?;
        Ok(self.tenants.remove(&id).is_some())
    }
}
