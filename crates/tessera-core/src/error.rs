use thiserror::Error;

/// Core error types for tenant domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid tenant name: {0}")]
    InvalidTenantName(String),

    #[error("Invalid tenant id: {0}")]
    InvalidId(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),
}

impl CoreError {
    /// Create a new `InvalidTenantName` error.
    pub fn invalid_tenant_name(message: impl Into<String>) -> Self {
        Self::InvalidTenantName(message.into())
    }

    /// Create a new `InvalidId` error.
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Check if this error is a client error (4xx category).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTenantName(_) | Self::InvalidId(_) | Self::UuidError(_)
        )
    }
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_tenant_name("too short");
        assert_eq!(err.to_string(), "Invalid tenant name: too short");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_uuid_error_conversion() {
        let uuid_err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let core_err: CoreError = uuid_err.into();
        assert!(matches!(core_err, CoreError::UuidError(_)));
        assert!(core_err.is_client_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert!(!core_err.is_client_error());
    }
}
