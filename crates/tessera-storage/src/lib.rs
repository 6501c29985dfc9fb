//! Store-of-record abstraction for tenant records.
//!
//! The [`TenantStore`] trait is the narrow contract the resolver and the
//! HTTP layer consume; backends (PostgreSQL, in-memory) implement it. The
//! store of record is always authoritative — cache entries are snapshots
//! of what a store read returned, never the other way around.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryTenantStore;
pub use traits::TenantStore;
