//! # Error Types
//!
//! All error types for registry requests, ledger access and notification delivery.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Structured failure returned by every registry entry point.
///
/// Argument positions are 1-based, matching the order callers supply them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Wrong number of arguments for the operation.
    #[error("incorrect number of arguments: expecting {expected}, got {actual}")]
    Arity { expected: usize, actual: usize },

    /// A required argument was the empty string.
    #[error("argument {position} must be a non-empty string")]
    EmptyArgument { position: usize },

    /// An argument that must be an integer did not parse as one.
    #[error("argument {position} must be a numeric string, got {value:?}")]
    NotNumeric { position: usize, value: String },

    /// Contract terms already exist for this product type.
    #[error("terms of contract for product {product_type} already exist")]
    DuplicateContract { product_type: String },

    /// Nothing is stored under the queried key.
    #[error("no value stored for key {key:?}")]
    NotFound { key: String },

    /// The operation name is not routed by this entry point.
    #[error("received unknown function invocation: {name:?}")]
    UnknownOperation { name: String },

    /// The ledger failed underneath the request.
    #[error("ledger failure: {0}")]
    Io(#[from] LedgerError),
}

impl RegistryError {
    /// Stable classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Arity { .. } => ErrorKind::Arity,
            Self::EmptyArgument { .. } => ErrorKind::EmptyArgument,
            Self::NotNumeric { .. } => ErrorKind::NotNumeric,
            Self::DuplicateContract { .. } => ErrorKind::DuplicateContract,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// Returns true if the request was rejected by argument validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Arity { .. } | Self::EmptyArgument { .. } | Self::NotNumeric { .. }
        )
    }
}

/// Error classification exposed to hosts, logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Arity,
    EmptyArgument,
    NotNumeric,
    DuplicateContract,
    NotFound,
    UnknownOperation,
    IoFailure,
}

impl ErrorKind {
    /// Snake-case label, identical to the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arity => "arity",
            Self::EmptyArgument => "empty_argument",
            Self::NotNumeric => "not_numeric",
            Self::DuplicateContract => "duplicate_contract",
            Self::NotFound => "not_found",
            Self::UnknownOperation => "unknown_operation",
            Self::IoFailure => "io_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from the key/value ledger underneath the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Read or write against the backing store failed.
    #[error("ledger I/O error: {message}")]
    Io { message: String },

    /// A stored value could not be decoded.
    #[error("corrupted value under {key:?}: {reason}")]
    Corrupted { key: String, reason: String },

    /// An in-process lock guarding the store was poisoned.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    pub(crate) fn corrupted(key: &str, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// NOTIFICATION ERRORS
// =============================================================================

/// Errors from the notification channel. Never fail a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Nobody is listening on the channel; the event was dropped.
    #[error("event on channel {channel:?} dropped: no subscribers")]
    NoSubscribers { channel: String },

    /// The sink could not accept the event.
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::Arity {
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments: expecting 2, got 3"
        );

        let err = RegistryError::EmptyArgument { position: 1 };
        assert_eq!(err.to_string(), "argument 1 must be a non-empty string");

        let err = RegistryError::DuplicateContract {
            product_type: "perishable".to_string(),
        };
        assert!(err.to_string().contains("perishable"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            RegistryError::NotFound { key: "k".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ErrorKind::IoFailure.to_string(), "io_failure");
        assert_eq!(
            serde_json::to_string(&ErrorKind::DuplicateContract).unwrap(),
            "\"duplicate_contract\""
        );
    }

    #[test]
    fn test_ledger_error_conversion() {
        let err: RegistryError = LedgerError::LockPoisoned.into();
        assert!(matches!(err, RegistryError::Io(LedgerError::LockPoisoned)));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(!err.is_validation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: LedgerError = io.into();
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(RegistryError::EmptyArgument { position: 2 }.is_validation());
        assert!(RegistryError::NotNumeric {
            position: 2,
            value: "x".into()
        }
        .is_validation());
        assert!(!RegistryError::UnknownOperation { name: "x".into() }.is_validation());
    }
}
