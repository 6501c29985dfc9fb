//! Cache key naming and TTL policy.
//!
//! Three key families hold tenant snapshots, plus a reserved wildcard
//! namespace for tenant-scoped derived caches (license listings and the
//! like), swept on tenant deletion:
//!
//! | key                | value                        | TTL    |
//! |--------------------|------------------------------|--------|
//! | `tenant:<id>`      | one snapshot (JSON)          | 3600 s |
//! | `tenants:all`      | full listing (JSON array)    | 3600 s |
//! | `apikey:<key>`     | snapshot owning that key     | 3600 s |
//! | `tenant:<id>:*`    | derived tenant-scoped caches | varies |

use std::time::Duration;
use uuid::Uuid;

/// Standard TTL for tenant snapshots. The TTL bounds staleness; explicit
/// invalidation is still required on every mutation.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Key for the full tenant listing.
pub const TENANTS_ALL: &str = "tenants:all";

/// Key for a single tenant snapshot.
pub fn tenant(id: Uuid) -> String {
    format!("tenant:{id}")
}

/// Key for the snapshot reachable by an API key.
pub fn api_key(key: &str) -> String {
    format!("apikey:{key}")
}

/// Wildcard pattern covering every tenant-scoped derived cache entry.
///
/// Only valid as a `keys_matching` argument, never as a storage key.
pub fn tenant_wildcard(id: Uuid) -> String {
    format!("tenant:{id}:*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes() {
        let id = Uuid::nil();
        assert_eq!(tenant(id), "tenant:00000000-0000-0000-0000-000000000000");
        assert_eq!(
            tenant_wildcard(id),
            "tenant:00000000-0000-0000-0000-000000000000:*"
        );
        assert_eq!(api_key("abc123"), "apikey:abc123");
        assert_eq!(TENANTS_ALL, "tenants:all");
    }

    #[test]
    fn wildcard_does_not_match_the_snapshot_key_itself() {
        // The sweep pattern covers derived entries only; `tenant:<id>` and
        // `apikey:<key>` are deleted explicitly by the coordinator.
        let id = Uuid::nil();
        let pattern = tenant_wildcard(id);
        let prefix = pattern.trim_end_matches('*');
        assert!(!tenant(id).starts_with(prefix));
        assert!(!api_key("abc").starts_with(prefix));
    }
}
