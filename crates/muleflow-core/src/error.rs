//! Error types for the muleflow engine.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during an analysis run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A transaction violated the input contract (caller-side validation bug).
    #[error("invalid transaction {transaction_id}: {reason}")]
    InvalidTransaction {
        /// Offending transaction ID.
        transaction_id: String,
        /// What the transaction violated.
        reason: String,
    },

    /// An engine invariant was violated; indicates an engine bug.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration failed validation or could not be loaded.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EngineError {
    /// Create an invalid-transaction error.
    #[must_use]
    pub fn invalid_transaction(id: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidTransaction {
            transaction_id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invariant-violation error.
    #[must_use]
    pub fn invariant(msg: impl Into<String>) -> Self {
        EngineError::InvariantViolation(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::ConfigError(msg.into())
    }

    /// Returns true if the caller can recover by fixing its input.
    ///
    /// Invariant violations are engine bugs and are never recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTransaction { .. } | EngineError::ConfigError(_)
        )
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::SerializationError(err.to_string())
    }
}
