// crates/memdrift-store/src/cache.rs
//
// In-memory read cache layered over durable storage.
//
// Entries are keyed by (kind, identifier). Writers must call `invalidate`
// before persisting so the next read goes back to disk.

use std::collections::HashMap;
use std::sync::RwLock;

use memdrift_core::{Headers, ResourceKind};

/// A cached store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub content: Vec<u8>,
    pub headers: Headers,
    /// Failure message of an entry recorded as a failed fetch.
    pub error: Option<String>,
}

impl CachedEntry {
    pub fn new(content: Vec<u8>, headers: Headers) -> Self {
        Self {
            content,
            headers,
            error: None,
        }
    }
}

/// Read cache keyed by `(ResourceKind, key)`.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: RwLock<HashMap<(ResourceKind, String), CachedEntry>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry.
    pub fn get(&self, kind: ResourceKind, key: &str) -> Option<CachedEntry> {
        // A poisoned lock only means a reader panicked; the map itself is intact.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&(kind, key.to_string())).cloned()
    }

    /// Insert or replace an entry after a durable read.
    pub fn insert(&self, kind: ResourceKind, key: &str, entry: CachedEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert((kind, key.to_string()), entry);
    }

    /// Drop an entry. Returns whether anything was cached.
    pub fn invalidate(&self, kind: ResourceKind, key: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&(kind, key.to_string())).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
