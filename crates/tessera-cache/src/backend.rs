//! Cache backend with in-memory and Redis modes.

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::CacheError;

/// A cached entry with TTL support (memory mode only; Redis enforces TTL
/// natively via `SET EX`).
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Vec<u8>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create a new cached entry.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Key/value cache store with per-entry expiration.
///
/// ## Cache Modes
///
/// - **Memory**: single-process `DashMap`, used by tests and when Redis is
///   disabled in configuration.
/// - **Redis**: shared across instances via a `deadpool` pool; every
///   operation is bounded by `op_timeout`.
///
/// ## Failure policy
///
/// `get` and `set` are best-effort: errors and timeouts degrade to a miss
/// or a skipped population write. `delete` and `keys_matching` back the
/// invalidation path and propagate failure.
#[derive(Clone)]
pub enum CacheBackend {
    /// Single-instance: in-process map only.
    Memory {
        map: Arc<DashMap<String, CachedEntry>>,
        // When set, the backend behaves like an unreachable cache. Lets
        // tests exercise the fail-open read and fail-closed invalidation
        // paths without a real outage.
        broken: Arc<AtomicBool>,
    },

    /// Multi-instance: shared Redis.
    Redis {
        pool: Pool,
        op_timeout: Duration,
    },
}

impl CacheBackend {
    /// Create a new in-memory cache backend.
    pub fn new_memory() -> Self {
        CacheBackend::Memory {
            map: Arc::new(DashMap::new()),
            broken: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulates cache unavailability (memory mode only; no-op for Redis).
    pub fn set_unavailable(&self, unavailable: bool) {
        if let CacheBackend::Memory { broken, .. } = self {
            broken.store(unavailable, Ordering::SeqCst);
        }
    }

    /// Create a Redis-backed cache backend and verify connectivity.
    ///
    /// # Errors
    ///
    /// Fails if the pool cannot be built or an initial connection cannot
    /// be obtained within `op_timeout`.
    pub async fn connect_redis(
        url: &str,
        pool_size: usize,
        op_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let cfg = redis_pool_config(url, pool_size, op_timeout);
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        // Fail fast on a dead Redis instead of at first request.
        tokio::time::timeout(op_timeout, pool.get())
            .await
            .map_err(|_| CacheError::timeout("connect"))??;

        Ok(CacheBackend::Redis { pool, op_timeout })
    }

    /// Get a value from the cache.
    ///
    /// Fail-open: any cache failure (connection, command, timeout) is
    /// logged and reported as a miss, so callers degrade to the store of
    /// record. An expired memory entry is removed on read.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self {
            CacheBackend::Memory { map, broken } => {
                if broken.load(Ordering::SeqCst) {
                    tracing::warn!(key = %key, "cache unavailable, treating as miss");
                    return None;
                }
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        tracing::debug!(key = %key, "cache hit");
                        return Some(entry.data.clone());
                    }
                    drop(entry);
                    map.remove(key);
                }
                tracing::debug!(key = %key, "cache miss");
                None
            }
            CacheBackend::Redis { pool, op_timeout } => {
                let fut = async {
                    let mut conn = pool.get().await?;
                    let data: Option<Vec<u8>> = conn.get(key).await?;
                    Ok::<_, CacheError>(data)
                };
                match tokio::time::timeout(*op_timeout, fut).await {
                    Ok(Ok(Some(data))) => {
                        tracing::debug!(key = %key, "cache hit");
                        Some(data)
                    }
                    Ok(Ok(None)) => {
                        tracing::debug!(key = %key, "cache miss");
                        None
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(key = %key, error = %e, "cache GET failed, treating as miss");
                        None
                    }
                    Err(_) => {
                        tracing::warn!(key = %key, "cache GET timed out, treating as miss");
                        None
                    }
                }
            }
        }
    }

    /// Set a value with a TTL.
    ///
    /// Best-effort: population writes that fail are logged and dropped —
    /// the next read simply misses again. Never used for invalidation.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        match self {
            CacheBackend::Memory { map, broken } => {
                if broken.load(Ordering::SeqCst) {
                    tracing::warn!(key = %key, "cache unavailable, skipping population");
                    return;
                }
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
            }
            CacheBackend::Redis { pool, op_timeout } => {
                let fut = async {
                    let mut conn = pool.get().await?;
                    conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
                    Ok::<_, CacheError>(())
                };
                match tokio::time::timeout(*op_timeout, fut).await {
                    Ok(Ok(())) => {
                        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(key = %key, error = %e, "cache SET failed, skipping population");
                    }
                    Err(_) => {
                        tracing::warn!(key = %key, "cache SET timed out, skipping population");
                    }
                }
            }
        }
    }

    /// Delete keys. Absent keys delete cleanly.
    ///
    /// Fail-closed: this is the invalidation write path, so errors and
    /// timeouts propagate to the caller.
    pub async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        match self {
            CacheBackend::Memory { map, broken } => {
                if broken.load(Ordering::SeqCst) {
                    return Err(CacheError::Connection("cache marked unavailable".into()));
                }
                for key in keys {
                    map.remove(key);
                }
                Ok(())
            }
            CacheBackend::Redis { pool, op_timeout } => {
                let fut = async {
                    let mut conn = pool.get().await?;
                    conn.del::<_, ()>(keys).await?;
                    Ok::<_, CacheError>(())
                };
                tokio::time::timeout(*op_timeout, fut)
                    .await
                    .map_err(|_| CacheError::timeout("DEL"))??;
                tracing::debug!(count = keys.len(), "cache entries deleted");
                Ok(())
            }
        }
    }

    /// List keys matching a glob pattern.
    ///
    /// Implemented with cursored `SCAN` (never `KEYS`) in Redis mode and a
    /// prefix walk in memory mode. O(keyspace) — only for the bulk wildcard
    /// sweep on tenant deletion, never on a per-request path.
    pub async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        match self {
            CacheBackend::Memory { map, broken } => {
                if broken.load(Ordering::SeqCst) {
                    return Err(CacheError::Connection("cache marked unavailable".into()));
                }
                let matched = match pattern.strip_suffix('*') {
                    Some(prefix) => map
                        .iter()
                        .map(|e| e.key().clone())
                        .filter(|k| k.starts_with(prefix))
                        .collect(),
                    None => map
                        .iter()
                        .map(|e| e.key().clone())
                        .filter(|k| k == pattern)
                        .collect(),
                };
                Ok(matched)
            }
            CacheBackend::Redis { pool, op_timeout } => {
                let fut = async {
                    let mut conn = pool.get().await?;
                    let mut iter: redis::AsyncIter<String> = conn.scan_match(pattern).await?;
                    let mut keys = Vec::new();
                    while let Some(key) = iter.next_item().await {
                        keys.push(key);
                    }
                    Ok::<_, CacheError>(keys)
                };
                tokio::time::timeout(*op_timeout, fut)
                    .await
                    .map_err(|_| CacheError::timeout("SCAN"))?
            }
        }
    }

    /// Number of live entries (memory mode; `None` for Redis).
    pub fn len(&self) -> Option<usize> {
        match self {
            CacheBackend::Memory { map, .. } => Some(map.len()),
            CacheBackend::Redis { .. } => None,
        }
    }

    /// Whether the backend is the shared Redis mode.
    pub fn is_shared(&self) -> bool {
        matches!(self, CacheBackend::Redis { .. })
    }

    /// Check backend reachability (for readiness probes).
    pub async fn is_available(&self) -> bool {
        match self {
            CacheBackend::Memory { broken, .. } => !broken.load(Ordering::SeqCst),
            CacheBackend::Redis { pool, op_timeout } => {
                matches!(
                    tokio::time::timeout(*op_timeout, pool.get()).await,
                    Ok(Ok(_))
                )
            }
        }
    }
}

/// Builds the deadpool config for a Redis backend.
///
/// `Config::from_url` leaves the pool section unset, so sizing and
/// acquisition timeouts must be installed explicitly or the pool runs
/// with deadpool's defaults.
fn redis_pool_config(url: &str, pool_size: usize, op_timeout: Duration) -> deadpool_redis::Config {
    let mut cfg = deadpool_redis::Config::from_url(url);
    let mut pool_cfg = deadpool_redis::PoolConfig::new(pool_size);
    pool_cfg.timeouts.wait = Some(op_timeout);
    pool_cfg.timeouts.create = Some(op_timeout);
    pool_cfg.timeouts.recycle = Some(op_timeout);
    cfg.pool = Some(pool_cfg);
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_set_round_trip() {
        let cache = CacheBackend::new_memory();
        cache
            .set("k", b"value".to_vec(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("k").await, Some(b"value".to_vec()));
        assert_eq!(cache.len(), Some(1));
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let cache = CacheBackend::new_memory();
        cache
            .set("k", b"value".to_vec(), Duration::from_millis(10))
            .await;
        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get("k").await.is_none());
        // The expired entry was dropped on read.
        assert_eq!(cache.len(), Some(0));
    }

    #[tokio::test]
    async fn delete_removes_entries_and_tolerates_absent_keys() {
        let cache = CacheBackend::new_memory();
        cache.set("a", b"1".to_vec(), Duration::from_secs(60)).await;
        cache.set("b", b"2".to_vec(), Duration::from_secs(60)).await;

        cache
            .delete(&["a".into(), "b".into(), "missing".into()])
            .await
            .unwrap();

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());

        // Empty key list is a no-op.
        cache.delete(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn keys_matching_prefix_and_exact() {
        let cache = CacheBackend::new_memory();
        let ttl = Duration::from_secs(60);
        cache.set("tenant:1:licenses", b"x".to_vec(), ttl).await;
        cache.set("tenant:1:usage", b"x".to_vec(), ttl).await;
        cache.set("tenant:2:licenses", b"x".to_vec(), ttl).await;
        cache.set("tenants:all", b"x".to_vec(), ttl).await;

        let mut matched = cache.keys_matching("tenant:1:*").await.unwrap();
        matched.sort();
        assert_eq!(matched, vec!["tenant:1:licenses", "tenant:1:usage"]);

        let exact = cache.keys_matching("tenants:all").await.unwrap();
        assert_eq!(exact, vec!["tenants:all"]);

        assert!(cache.keys_matching("nothing:*").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_backend_is_always_available() {
        let cache = CacheBackend::new_memory();
        assert!(cache.is_available().await);
        assert!(!cache.is_shared());
    }

    #[tokio::test]
    async fn unavailable_cache_fails_open_on_reads_and_closed_on_deletes() {
        let cache = CacheBackend::new_memory();
        cache.set("k", b"v".to_vec(), Duration::from_secs(60)).await;

        cache.set_unavailable(true);
        assert!(!cache.is_available().await);

        // Reads degrade to misses, population writes are dropped.
        assert!(cache.get("k").await.is_none());
        cache.set("k2", b"v".to_vec(), Duration::from_secs(60)).await;

        // Invalidation operations propagate the failure.
        assert!(cache.delete(&["k".into()]).await.is_err());
        assert!(cache.keys_matching("k*").await.is_err());

        // Recovery: the pre-outage entry is intact, the dropped write is not.
        cache.set_unavailable(false);
        assert_eq!(cache.get("k").await, Some(b"v".to_vec()));
        assert!(cache.get("k2").await.is_none());
    }

    #[test]
    fn redis_pool_config_applies_sizing_and_timeouts() {
        // from_url alone leaves `pool` unset; the sizing must survive into
        // the config the pool is built from.
        let bare = deadpool_redis::Config::from_url("redis://localhost:6379");
        assert!(bare.pool.is_none());

        let timeout = Duration::from_millis(250);
        let cfg = redis_pool_config("redis://localhost:6379", 7, timeout);
        let pool_cfg = cfg.pool.expect("pool section must be set");
        assert_eq!(pool_cfg.max_size, 7);
        assert_eq!(pool_cfg.timeouts.wait, Some(timeout));
        assert_eq!(pool_cfg.timeouts.create, Some(timeout));
        assert_eq!(pool_cfg.timeouts.recycle, Some(timeout));
    }
}
