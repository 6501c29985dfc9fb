//! Cache-aside layer for tenant snapshots.
//!
//! ## Architecture
//!
//! - [`backend::CacheBackend`] — the key/value adapter (keys, bytes, TTL),
//!   in-process `DashMap` or shared Redis.
//! - [`keys`] — the one place cache key strings and the standard TTL are
//!   built, so no caller hand-formats a key.
//! - [`invalidation::InvalidationCoordinator`] — removes the key families a
//!   tenant mutation could have made stale.
//!
//! ## Failure policy
//!
//! Reads fail open (an unreachable cache degrades to a store-of-record
//! read); invalidation deletes fail closed (a swallowed invalidation
//! failure would let a deleted tenant keep authenticating until TTL
//! expiry).

pub mod backend;
pub mod error;
pub mod invalidation;
pub mod keys;

pub use backend::{CacheBackend, CachedEntry};
pub use error::CacheError;
pub use invalidation::InvalidationCoordinator;
