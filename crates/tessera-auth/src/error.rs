//! Authentication error taxonomy and HTTP response mapping.
//!
//! The conditions stay distinguishable all the way to the wire: a missing
//! credential, an unknown credential (tenant or admin), a deactivated
//! tenant, and an infrastructure failure must never collapse into one
//! generic outcome, and an infrastructure failure must never read as an
//! auth decision.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors produced at the authentication boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `x-api-key` header was presented. Distinct from an invalid key.
    #[error("API key required")]
    NoCredential,

    /// A key was presented but no tenant owns it.
    #[error("Invalid API key")]
    InvalidCredential,

    /// No `x-admin-key` header was presented on an admin route.
    #[error("Admin key required")]
    NoAdminCredential,

    /// The presented admin key does not match the configured key.
    #[error("Invalid admin key")]
    InvalidAdminCredential,

    /// The tenant exists but is deactivated.
    #[error("Tenant is inactive")]
    InactiveTenant,

    /// The cache or store of record was unavailable while authenticating.
    /// Maps to a 5xx, never to an auth refusal.
    #[error("Authentication backend unavailable: {0}")]
    Infrastructure(String),
}

impl AuthError {
    /// Creates an `Infrastructure` error from any failure source.
    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::Infrastructure(message.into())
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoCredential
            | Self::InvalidCredential
            | Self::NoAdminCredential
            | Self::InvalidAdminCredential => StatusCode::UNAUTHORIZED,
            Self::InactiveTenant => StatusCode::FORBIDDEN,
            Self::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The challenge advertised on a 401, naming the header the credential
    /// travels in.
    fn www_authenticate(&self) -> Option<HeaderValue> {
        match self {
            Self::NoCredential | Self::InvalidCredential => {
                Some(HeaderValue::from_static("ApiKey header=\"x-api-key\""))
            }
            Self::NoAdminCredential | Self::InvalidAdminCredential => {
                Some(HeaderValue::from_static("ApiKey header=\"x-admin-key\""))
            }
            Self::InactiveTenant | Self::Infrastructure(_) => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Do not leak backend details on 5xx responses.
        let message = match &self {
            Self::Infrastructure(detail) => {
                tracing::error!(error = %detail, "authentication infrastructure failure");
                "Authentication temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        let mut headers = HeaderMap::new();
        if let Some(challenge) = self.www_authenticate() {
            headers.insert(header::WWW_AUTHENTICATE, challenge);
        }

        (status, headers, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_stay_distinguishable() {
        assert_eq!(AuthError::NoCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::NoAdminCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidAdminCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::InactiveTenant.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::infrastructure("redis down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn infrastructure_message_is_not_leaked() {
        let response = AuthError::infrastructure("postgres: connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_carries_www_authenticate() {
        let response = AuthError::NoCredential.into_response();
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let response = AuthError::InactiveTenant.into_response();
        assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[test]
    fn challenge_names_the_header_the_credential_travels_in() {
        for err in [AuthError::NoCredential, AuthError::InvalidCredential] {
            let response = err.into_response();
            let challenge = response.headers()[header::WWW_AUTHENTICATE]
                .to_str()
                .unwrap();
            assert!(challenge.contains("x-api-key"));
        }

        for err in [
            AuthError::NoAdminCredential,
            AuthError::InvalidAdminCredential,
        ] {
            let response = err.into_response();
            let challenge = response.headers()[header::WWW_AUTHENTICATE]
                .to_str()
                .unwrap();
            assert!(challenge.contains("x-admin-key"));
        }
    }
}
