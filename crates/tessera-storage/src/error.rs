//! Storage error types for the tenant store abstraction.

/// Errors that can occur during store-of-record operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested tenant was not found.
    #[error("Tenant not found: {id}")]
    NotFound {
        /// The id of the tenant that was not found.
        id: String,
    },

    /// A uniqueness constraint was violated (name or API key).
    #[error("Tenant conflict on {field}: {value}")]
    Conflict {
        /// The conflicting column.
        field: String,
        /// The conflicting value.
        value: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new `ConnectionError`.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying against a healthy backend could succeed.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::ConnectionError { .. } | Self::Internal { .. })
    }
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
