//! Cache error types.

/// Errors from cache store operations that must not be swallowed.
///
/// Read-path failures never surface as this type — the backend degrades
/// them to misses. This error is what invalidation deletes and wildcard
/// scans propagate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Could not obtain a connection from the pool.
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// A Redis command failed.
    #[error("Cache command error: {0}")]
    Command(#[from] redis::RedisError),

    /// The operation exceeded its bounded timeout.
    #[error("Cache operation timed out: {op}")]
    Timeout {
        /// The operation that timed out (for logs).
        op: &'static str,
    },
}

impl CacheError {
    pub(crate) fn timeout(op: &'static str) -> Self {
        Self::Timeout { op }
    }
}

impl From<deadpool_redis::PoolError> for CacheError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        Self::Connection(err.to_string())
    }
}
