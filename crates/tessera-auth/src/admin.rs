//! Admin authentication extractor.
//!
//! Tenant CRUD is an administrative surface guarded by a single configured
//! key in the `x-admin-key` header, separate from tenant API keys. Tenant
//! credentials never grant admin access.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::extract::AuthState;

/// Header carrying the administrative key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Proof that the request presented the configured admin key.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let presented = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::NoAdminCredential)?;

        if !constant_time_eq(presented.as_bytes(), auth_state.admin_api_key.as_bytes()) {
            tracing::warn!("rejected request with wrong admin key");
            return Err(AuthError::InvalidAdminCredential);
        }

        Ok(Self)
    }
}

/// Byte-wise comparison that does not short-circuit on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_matches_equal_keys_only() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secre"));
        assert!(!constant_time_eq(b"", b"secret"));
        assert!(constant_time_eq(b"", b""));
    }
}
