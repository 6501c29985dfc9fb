//! PostgreSQL store-of-record backend.
//!
//! Implements [`tessera_storage::TenantStore`] over `sqlx-postgres` with an
//! embedded schema migration, so a single binary can bring up its own
//! tables on first start.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod tenant;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result};
pub use pool::create_pool;
pub use tenant::PgTenantStore;
