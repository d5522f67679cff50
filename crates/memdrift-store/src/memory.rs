// crates/memdrift-store/src/memory.rs
//
// In-memory content store. Same contract as `FileStore` without durability;
// used to exercise the Collection Model and the measures without a disk.

use std::collections::HashMap;
use std::sync::RwLock;

use memdrift_core::{ContentStore, Headers, MemdriftError, ResourceKind};

use crate::cache::CachedEntry;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<(ResourceKind, String), CachedEntry>,
    order: HashMap<ResourceKind, Vec<String>>,
}

/// Volatile store keeping everything in a single locked map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(kind: ResourceKind, key: &str) -> MemdriftError {
        MemdriftError::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl MemoryStore {
    fn insert(&self, kind: ResourceKind, key: &str, entry: CachedEntry) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let previous = inner.entries.insert((kind, key.to_string()), entry);
        if previous.is_none() {
            inner.order.entry(kind).or_default().push(key.to_string());
        }
    }

    fn read<T>(
        &self,
        kind: ResourceKind,
        key: &str,
        project: impl FnOnce(&CachedEntry) -> T,
    ) -> Result<T, MemdriftError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .entries
            .get(&(kind, key.to_string()))
            .map(project)
            .ok_or_else(|| Self::not_found(kind, key))
    }
}

impl ContentStore for MemoryStore {
    fn put(
        &self,
        kind: ResourceKind,
        key: &str,
        content: &[u8],
        headers: &Headers,
    ) -> Result<(), MemdriftError> {
        self.insert(kind, key, CachedEntry::new(content.to_vec(), headers.clone()));
        Ok(())
    }

    fn put_error(
        &self,
        kind: ResourceKind,
        key: &str,
        headers: &Headers,
        message: &str,
    ) -> Result<(), MemdriftError> {
        self.insert(
            kind,
            key,
            CachedEntry {
                content: Vec::new(),
                headers: headers.clone(),
                error: Some(message.to_string()),
            },
        );
        Ok(())
    }

    fn get_error(&self, kind: ResourceKind, key: &str) -> Result<Option<String>, MemdriftError> {
        self.read(kind, key, |entry| entry.error.clone())
    }

    fn get_content(&self, kind: ResourceKind, key: &str) -> Result<Vec<u8>, MemdriftError> {
        self.read(kind, key, |entry| entry.content.clone())
    }

    fn get_headers(&self, kind: ResourceKind, key: &str) -> Result<Headers, MemdriftError> {
        self.read(kind, key, |entry| entry.headers.clone())
    }

    fn contains(&self, kind: ResourceKind, key: &str) -> Result<bool, MemdriftError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.entries.contains_key(&(kind, key.to_string())))
    }

    fn keys(&self, kind: ResourceKind) -> Result<Vec<String>, MemdriftError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.order.get(&kind).cloned().unwrap_or_default())
    }
}
