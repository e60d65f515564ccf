//! # Store Errors
//!
//! Failures raised at the record store boundary.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
///
/// Every variant means the store could not serve the request. Callers above
/// the adapter treat them uniformly as "store unavailable".
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Request never completed (connect failure, timeout, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Store answered with a non-success status
    #[error("Store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid store response: {0}")]
    Decode(String),

    /// Storage key cannot be used in a store path
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Store is unreachable or refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "Store returned status 401: Permission denied");
    }
}
