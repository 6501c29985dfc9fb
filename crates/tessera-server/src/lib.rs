//! Tessera HTTP server.
//!
//! Wires the tenant store of record (PostgreSQL), the cache (Redis or
//! in-process), the identity resolver, and the axum routing surface into
//! one binary. Library form so integration tests can build the router
//! in-process.

use std::time::Duration;

pub mod api;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod tenants;

pub use config::AppConfig;
pub use server::{AppState, ServerBuilder, TesseraServer, build_app};

use tessera_cache::CacheBackend;

/// Builds the cache backend described by the configuration.
///
/// When Redis is enabled but unreachable at startup the server degrades
/// to the in-process cache rather than refusing to boot; auth and tenant
/// reads then fall back to the store of record at worst.
pub async fn create_cache_backend(cfg: &config::RedisConfig) -> CacheBackend {
    if !cfg.enabled {
        tracing::info!("Redis disabled, using in-process cache");
        return CacheBackend::new_memory();
    }

    let op_timeout = Duration::from_millis(cfg.timeout_ms);
    match CacheBackend::connect_redis(&cfg.url, cfg.pool_size, op_timeout).await {
        Ok(cache) => {
            tracing::info!(pool_size = cfg.pool_size, "connected to Redis cache");
            cache
        }
        Err(e) => {
            tracing::warn!(error = %e, "Redis unreachable, degrading to in-process cache");
            CacheBackend::new_memory()
        }
    }
}
