//! Tenant storage.
//!
//! Row layout follows the `tenants` table from the embedded migration;
//! every read materializes a plain [`Tenant`] snapshot.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use tessera_core::{NewTenant, Tenant};
use tessera_storage::{StorageResult, TenantStore};

use crate::error::map_sqlx;

/// Raw tenant row tuple as selected from PostgreSQL.
type TenantRow = (Uuid, String, String, bool, OffsetDateTime, OffsetDateTime);

fn from_row(row: TenantRow) -> Tenant {
    Tenant {
        id: row.0,
        name: row.1,
        api_key: row.2,
        active: row.3,
        created_at: row.4,
        updated_at: row.5,
    }
}

/// PostgreSQL-backed [`TenantStore`].
///
/// Holds a cloned pool handle; cloning the store is cheap and all clones
/// share the same connections.
#[derive(Clone)]
pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    /// Creates a new store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn find_by_api_key(&self, api_key: &str) -> StorageResult<Option<Tenant>> {
        let row: Option<TenantRow> = query_as(
            r#"
            SELECT id, name, api_key, active, created_at, updated_at
            FROM tenants
            WHERE api_key = $1
            "#,
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Tenant>> {
        let row: Option<TenantRow> = query_as(
            r#"
            SELECT id, name, api_key, active, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(from_row))
    }

    async fn find_all(&self) -> StorageResult<Vec<Tenant>> {
        let rows: Vec<TenantRow> = query_as(
            r#"
            SELECT id, name, api_key, active, created_at, updated_at
            FROM tenants
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn insert(&self, tenant: NewTenant) -> StorageResult<Tenant> {
        // Timestamps are assigned by the database so the returned snapshot
        // is exactly what later reads will see.
        let row: TenantRow = query_as(
            r#"
            INSERT INTO tenants (id, name, api_key, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, api_key, active, created_at, updated_at
            "#,
        )
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.api_key)
        .bind(tenant.active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let created = from_row(row);
        tracing::info!(tenant_id = %created.id, tenant = %created.name, "tenant created");
        Ok(created)
    }

    async fn delete_by_id(&self, id: Uuid) -> StorageResult<bool> {
        let result = query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(tenant_id = %id, "tenant deleted");
        }
        Ok(deleted)
    }
}
