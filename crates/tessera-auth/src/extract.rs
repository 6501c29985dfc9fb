//! API key authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, Json};
//! use tessera_auth::ApiKeyAuth;
//!
//! async fn whoami(ApiKeyAuth(tenant): ApiKeyAuth) -> Json<String> {
//!     Json(tenant.name)
//! }
//!
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .with_state(app_state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tessera_core::Tenant;

use crate::error::AuthError;
use crate::resolver::{IdentityResolver, Verdict};

/// Header carrying the tenant API key. Opaque non-empty string; no format
/// beyond that is imposed here.
pub const API_KEY_HEADER: &str = "x-api-key";

/// State required for API key authentication.
///
/// Include it in your application state and expose it to the extractors
/// via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Shared identity resolver.
    pub resolver: Arc<IdentityResolver>,

    /// Key granting access to the administrative tenant CRUD routes.
    pub admin_api_key: String,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(resolver: Arc<IdentityResolver>, admin_api_key: impl Into<String>) -> Self {
        Self {
            resolver,
            admin_api_key: admin_api_key.into(),
        }
    }
}

/// Axum extractor that authenticates the tenant behind `x-api-key`.
///
/// 1. Extracts the header — absent or empty is [`AuthError::NoCredential`],
///    a distinct condition from an invalid key.
/// 2. Runs the resolver (cache first, store of record on miss).
/// 3. Maps the verdict: active tenant passes through, unknown key is
///    [`AuthError::InvalidCredential`], deactivated tenant is
///    [`AuthError::InactiveTenant`], backend failure is
///    [`AuthError::Infrastructure`].
pub struct ApiKeyAuth(pub Tenant);

impl<S> FromRequestParts<S> for ApiKeyAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::NoCredential)?;

        let verdict = auth_state
            .resolver
            .resolve(api_key)
            .await
            .map_err(|e| AuthError::infrastructure(e.to_string()))?;

        match verdict {
            Verdict::Active(tenant) => {
                tracing::debug!(tenant_id = %tenant.id, tenant = %tenant.name, "tenant authenticated");
                Ok(Self(tenant))
            }
            Verdict::Inactive(tenant) => {
                tracing::debug!(tenant_id = %tenant.id, tenant = %tenant.name, "inactive tenant rejected");
                Err(AuthError::InactiveTenant)
            }
            Verdict::NotFound => {
                tracing::debug!("unknown API key rejected");
                Err(AuthError::InvalidCredential)
            }
        }
    }
}
