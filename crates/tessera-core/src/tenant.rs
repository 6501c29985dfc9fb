//! Tenant snapshot types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::api_key::generate_api_key;
use crate::error::{CoreError, Result};

/// Minimum length for a tenant display name.
pub const NAME_MIN_LEN: usize = 3;
/// Maximum length for a tenant display name.
pub const NAME_MAX_LEN: usize = 100;

/// An immutable snapshot of a tenant record.
///
/// The JSON representation (camelCase, RFC 3339 timestamps) is also the
/// persisted cache value layout, so field names and formats here are part
/// of the wire contract:
///
/// ```json
/// {
///   "id": "9f8c…",
///   "name": "Acme",
///   "apiKey": "64 hex chars",
///   "active": true,
///   "createdAt": "2026-01-01T00:00:00Z",
///   "updatedAt": "2026-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Opaque unique identifier, immutable for the tenant's lifetime.
    pub id: Uuid,
    /// Unique display name, 3-100 characters.
    pub name: String,
    /// Opaque credential, unique and never reissued once assigned.
    pub api_key: String,
    /// Whether the tenant may authenticate. Set at creation time.
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Input for creating a tenant. The id and API key are assigned here, so a
/// `NewTenant` already carries the credential that will be persisted.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub id: Uuid,
    pub name: String,
    pub api_key: String,
    pub active: bool,
}

impl NewTenant {
    /// Builds a new tenant with a fresh id and API key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTenantName`] if the trimmed name is
    /// outside the 3-100 character range.
    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        validate_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            api_key: generate_api_key(),
            active: true,
        })
    }
}

/// Validates a tenant display name against the length rules.
pub fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(CoreError::invalid_tenant_name(format!(
            "name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

impl Tenant {
    /// Materializes the snapshot a freshly inserted row will have.
    ///
    /// Storage backends that assign timestamps server-side should prefer
    /// returning the row they actually wrote.
    pub fn from_new(new: NewTenant, now: OffsetDateTime) -> Self {
        Self {
            id: new.id,
            name: new.name,
            api_key: new.api_key,
            active: new.active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Tenant {
        Tenant {
            id: Uuid::nil(),
            name: "Acme".into(),
            api_key: "ab".repeat(32),
            active: true,
            created_at: datetime!(2026-01-01 00:00:00 UTC),
            updated_at: datetime!(2026-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn snapshot_json_uses_camel_case_and_rfc3339() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["apiKey"], serde_json::json!("ab".repeat(32)));
        assert_eq!(json["createdAt"], serde_json::json!("2026-01-01T00:00:00Z"));
        assert_eq!(json["updatedAt"], serde_json::json!("2026-01-01T00:00:00Z"));
        assert_eq!(json["active"], serde_json::json!(true));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let tenant = sample();
        let bytes = serde_json::to_vec(&tenant).unwrap();
        let back: Tenant = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, tenant);
    }

    #[test]
    fn new_tenant_assigns_id_and_key() {
        let a = NewTenant::with_name("Acme").unwrap();
        let b = NewTenant::with_name("Acme").unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.api_key, b.api_key);
        assert!(a.active);
    }

    #[test]
    fn new_tenant_trims_and_validates_name() {
        let t = NewTenant::with_name("  Acme  ").unwrap();
        assert_eq!(t.name, "Acme");

        assert!(NewTenant::with_name("ab").is_err());
        assert!(NewTenant::with_name("x".repeat(101)).is_err());
        assert!(NewTenant::with_name("x".repeat(100)).is_ok());
    }
}
