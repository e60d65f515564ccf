//! # Resolution Errors
//!
//! Outcome kinds of the user record operations.

use thiserror::Error;

use crate::records::StoreError;

/// Result type for resolution operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record operation errors
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    // ==================
    // Client Errors
    // ==================
    /// Required field missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record (or no matching record) exists
    #[error("{0}")]
    NotFound(String),

    /// Name resolves to several records and the policy refuses to pick
    #[error("Name '{name}' matches {matches} records; refusing to choose one")]
    Ambiguous { name: String, matches: usize },

    // ==================
    // Server Errors
    // ==================
    /// Store failed or was unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl RecordError {
    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RecordError::StoreUnavailable(_))
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        RecordError::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_become_unavailable() {
        let err = RecordError::from(StoreError::Transport("connection refused".to_string()));
        assert!(matches!(err, RecordError::StoreUnavailable(ref cause) if cause.contains("connection refused")));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(RecordError::InvalidInput("name".to_string()).is_client_error());
        assert!(RecordError::NotFound("none".to_string()).is_client_error());
        assert!(RecordError::Ambiguous {
            name: "A".to_string(),
            matches: 2
        }
        .is_client_error());
    }
}
