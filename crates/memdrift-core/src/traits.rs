// crates/memdrift-core/src/traits.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MemdriftError;
use crate::headers::Headers;

/// Namespaces of the content store. TimeMap and Memento identifiers never
/// collide, even when textually equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    TimeMap,
    Memento,
}

impl ResourceKind {
    /// Directory name of the namespace in the durable layout.
    pub fn namespace(&self) -> &'static str {
        match self {
            ResourceKind::TimeMap => "timemaps",
            ResourceKind::Memento => "mementos",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::TimeMap => f.write_str("timemap"),
            ResourceKind::Memento => f.write_str("memento"),
        }
    }
}

/// Trait for the keyed content store behind the Collection Model.
///
/// Implemented by memdrift-store (file-backed and in-memory backends).
pub trait ContentStore: Send + Sync {
    /// Persist content and headers under a namespaced key. Overwrites on re-put.
    fn put(
        &self,
        kind: ResourceKind,
        key: &str,
        content: &[u8],
        headers: &Headers,
    ) -> Result<(), MemdriftError>;

    /// Record a failed fetch under a namespaced key: headers and an error
    /// message, no content. The key is listed like any other entry and a
    /// later `put` replaces the failure.
    fn put_error(
        &self,
        kind: ResourceKind,
        key: &str,
        headers: &Headers,
        message: &str,
    ) -> Result<(), MemdriftError>;

    /// Failure message recorded under the key, `None` for a normal entry.
    /// `NotFound` if never put.
    fn get_error(&self, kind: ResourceKind, key: &str) -> Result<Option<String>, MemdriftError>;

    /// Content bytes stored under the key. `NotFound` if never put.
    fn get_content(&self, kind: ResourceKind, key: &str) -> Result<Vec<u8>, MemdriftError>;

    /// Headers stored under the key. `NotFound` if never put.
    fn get_headers(&self, kind: ResourceKind, key: &str) -> Result<Headers, MemdriftError>;

    /// Whether the key has been put.
    fn contains(&self, kind: ResourceKind, key: &str) -> Result<bool, MemdriftError>;

    /// All keys of a namespace in first-insertion order.
    fn keys(&self, kind: ResourceKind) -> Result<Vec<String>, MemdriftError>;
}
