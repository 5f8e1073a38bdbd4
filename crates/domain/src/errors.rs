//! Error types used throughout the replication pipeline

use thiserror::Error;

/// Main error type for rowsync operations.
///
/// Transient failures (a dropped connection, a busy database) carry a
/// `transient` flag set by the adapter that produced them; everything else is
/// fatal on first occurrence.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid configuration; never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// A declared check column is absent from the local row while the remote
    /// side carries a non-empty value. Signals a local/remote schema mismatch.
    #[error("check column {0} does not exist in local row")]
    MissingCheckColumn(String),

    /// A provider returned a row that violates the data contract (for example
    /// a missing key the pipeline needs).
    #[error("data contract violation: {0}")]
    DataContract(String),

    /// Statement execution or connection failure in the local store.
    #[error("database error: {message}")]
    Database {
        /// Driver-level description of the failure.
        message: String,
        /// Whether the adapter classified the failure as retry-worthy.
        transient: bool,
    },

    /// Failure while fetching a page from a remote source.
    #[error("fetch error: {message}")]
    Fetch {
        /// Source-level description of the failure.
        message: String,
        /// Whether the adapter classified the failure as retry-worthy.
        transient: bool,
    },
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a data contract error.
    pub fn data_contract(message: impl Into<String>) -> Self {
        Self::DataContract(message.into())
    }

    /// Create a fatal database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database { message: message.into(), transient: false }
    }

    /// Create a transient database error.
    pub fn transient_database(message: impl Into<String>) -> Self {
        Self::Database { message: message.into(), transient: true }
    }

    /// Create a fatal fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch { message: message.into(), transient: false }
    }

    /// Create a transient fetch error.
    pub fn transient_fetch(message: impl Into<String>) -> Self {
        Self::Fetch { message: message.into(), transient: true }
    }

    /// Can the failed operation be retried as-is?
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database { transient, .. } | Self::Fetch { transient, .. } => *transient,
            Self::Config(_) | Self::MissingCheckColumn(_) | Self::DataContract(_) => false,
        }
    }
}

/// Result type alias for rowsync operations
pub type Result<T> = std::result::Result<T, SyncError>;
