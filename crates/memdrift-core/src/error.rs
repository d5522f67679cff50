// crates/memdrift-core/src/error.rs

use thiserror::Error;

use crate::traits::ResourceKind;

/// Workspace-wide error types for Memdrift.
#[derive(Debug, Error)]
pub enum MemdriftError {
    /// TimeMap text could not be parsed. Names the TimeMap being ingested.
    #[error("Malformed TimeMap {urit}: {source}")]
    MalformedTimeMap {
        urit: String,
        #[source]
        source: TimeMapParseError,
    },

    /// Query for a URI-T that was never ingested.
    #[error("No such TimeMap: {0}")]
    NoSuchTimeMap(String),

    /// Query for a URI-M that was never ingested.
    #[error("No such Memento: {0}")]
    NoSuchMemento(String),

    /// The TimeMap was recorded as a failed fetch; it has no Link text.
    #[error("TimeMap {urit} was recorded as failed: {message}")]
    TimeMapError { urit: String, message: String },

    /// The Memento was recorded as a failed fetch; it has no content.
    #[error("Memento {urim} was recorded as failed: {message}")]
    MementoError { urim: String, message: String },

    /// Content store miss for a namespaced key.
    #[error("Not found: {kind} {key}")]
    NotFound { kind: ResourceKind, key: String },

    /// Contradictory or unknown measure options.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Durable read/write failure in the content store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A background scoring worker panicked or was cancelled.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl MemdriftError {
    /// Whether this error reports a missing key (store miss or typed query miss).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MemdriftError::NotFound { .. }
                | MemdriftError::NoSuchTimeMap(_)
                | MemdriftError::NoSuchMemento(_)
        )
    }
}

impl MemdriftError {
    /// Whether this error reports an entry recorded as a failed fetch.
    pub fn is_recorded_failure(&self) -> bool {
        matches!(
            self,
            MemdriftError::TimeMapError { .. } | MemdriftError::MementoError { .. }
        )
    }
}

impl From<serde_json::Error> for MemdriftError {
    fn from(e: serde_json::Error) -> Self {
        MemdriftError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MemdriftError {
    fn from(e: std::io::Error) -> Self {
        MemdriftError::Storage(e.to_string())
    }
}

/// Failures of the pure TimeMap parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeMapParseError {
    /// A Link segment did not start with a `<URI>` reference.
    #[error("segment {segment} has no bracketed URI")]
    MissingUri { segment: usize },

    /// A memento entry carried no `datetime` attribute.
    #[error("memento {uri} has no datetime attribute")]
    MissingDatetime { uri: String },
}
