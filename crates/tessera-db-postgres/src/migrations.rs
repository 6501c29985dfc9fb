//! Database migration management for the PostgreSQL storage backend.
//!
//! Migrations are embedded in the binary at compile time for single-binary
//! deployment; applied versions are tracked in the `_sqlx_migrations`
//! table.

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Embedded migrations, in chronological order.
///
/// To add a migration: create the SQL file under `migrations/` and add a
/// `(version, description, include_str!(..))` entry here.
const EMBEDDED_MIGRATIONS: &[(i64, &str, &str)] = &[(
    20260801000001,
    "tenants_schema",
    include_str!("../migrations/20260801000001_tenants_schema.sql"),
)];

fn build_migrations() -> Vec<Migration> {
    EMBEDDED_MIGRATIONS
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]), // Empty checksum for embedded migrations
            no_tx: false,
        })
        .collect()
}

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrations = build_migrations();
    info!("Running {} embedded migration(s)", migrations.len());

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_well_formed() {
        let migrations = build_migrations();
        assert!(!migrations.is_empty());
        assert!(
            migrations.windows(2).all(|w| w[0].version < w[1].version),
            "migration versions must be strictly increasing"
        );
        assert!(migrations.iter().all(|m| !m.sql.trim().is_empty()));
    }
}
