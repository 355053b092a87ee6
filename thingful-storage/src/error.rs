//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-related errors
///
/// Messages reported by the database are kept verbatim so that a failing
/// seed shows the constraint that was violated.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection-related errors
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution errors
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction errors
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Entity not found
    #[error("Entity not found")]
    NotFound,

    /// Duplicate key constraint violation
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Sequence value outside the sequence bounds
    #[error("Sequence out of bounds: {0}")]
    SequenceOutOfBounds(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Password hashing before insert failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl StorageError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::ConnectionFailed(_) | StorageError::TransactionFailed(_)
        )
    }

    /// Whether the store rejected the data itself
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StorageError::DuplicateKey(_) | StorageError::ForeignKeyViolation(_)
        )
    }

    /// Short machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ConnectionFailed(_) => "CONNECTION_ERROR",
            StorageError::QueryFailed(_) => "QUERY_ERROR",
            StorageError::TransactionFailed(_) => "TRANSACTION_ERROR",
            StorageError::NotFound => "NOT_FOUND",
            StorageError::DuplicateKey(_) => "DUPLICATE_KEY",
            StorageError::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            StorageError::SequenceOutOfBounds(_) => "SEQUENCE_OUT_OF_BOUNDS",
            StorageError::ConfigError(_) => "CONFIG_ERROR",
            StorageError::Hashing(_) => "HASHING_ERROR",
        }
    }
}

impl From<thingful_config::ConfigError> for StorageError {
    fn from(err: thingful_config::ConfigError) -> Self {
        StorageError::ConfigError(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    StorageError::DuplicateKey(db.message().to_string())
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    StorageError::ForeignKeyViolation(db.message().to_string())
                }
                _ => StorageError::QueryFailed(db.message().to_string()),
            },
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StorageError::ConnectionFailed(err.to_string()),
            sqlx::Error::Configuration(_) => StorageError::ConfigError(err.to_string()),
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
