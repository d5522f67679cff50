// crates/memdrift-store/src/fs.rs
//
// File-backed content store.
//
// Layout under the working directory:
//   - `timemaps/{sha256(key)}.json` -> StoredRecord
//   - `mementos/{sha256(key)}.json` -> StoredRecord
//   - `{namespace}/index.json`      -> keys in first-insertion order
//
// Every file is written to a temporary sibling and renamed into place, so a
// crash mid-write never leaves a partial record visible. The working
// directory is process-exclusive: there is no cross-process locking.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use memdrift_core::{ContentStore, Headers, MemdriftError, ResourceKind};

use crate::cache::{CachedEntry, ContentCache};

const INDEX_FILE: &str = "index.json";

/// On-disk form of one store entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    /// The identifier, kept so the hashed file name can be traced back.
    key: String,
    /// Content bytes, base64-encoded.
    content: String,
    headers: Headers,
    /// Set when the entry records a failed fetch instead of a capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Durable store rooted at a working directory, with an in-memory read cache.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    cache: ContentCache,
    /// Serializes writers so record and index updates do not interleave.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at the given working directory.
    ///
    /// Creates the directory and both namespaces if they do not exist. An
    /// existing directory is reused with its contents and key order intact.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, MemdriftError> {
        let root = root.as_ref().to_path_buf();
        for kind in [ResourceKind::TimeMap, ResourceKind::Memento] {
            let dir = root.join(kind.namespace());
            fs::create_dir_all(&dir).map_err(|e| {
                MemdriftError::Storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        tracing::debug!(root = %root.display(), "opened file store");

        Ok(Self {
            root,
            cache: ContentCache::new(),
            write_lock: Mutex::new(()),
        })
    }

    /// The working directory this store lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The read cache, exposed for inspection.
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    fn namespace_dir(&self, kind: ResourceKind) -> PathBuf {
        self.root.join(kind.namespace())
    }

    /// Build the record path: `{namespace}/{sha256(key)}.json`.
    fn record_path(&self, kind: ResourceKind, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.namespace_dir(kind)
            .join(format!("{}.json", hex::encode(digest)))
    }

    fn index_path(&self, kind: ResourceKind) -> PathBuf {
        self.namespace_dir(kind).join(INDEX_FILE)
    }

    /// Read and decode a record from disk. `Ok(None)` if it was never written.
    fn read_record(&self, kind: ResourceKind, key: &str) -> Result<Option<StoredRecord>, MemdriftError> {
        let path = self.record_path(kind, key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MemdriftError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let record: StoredRecord = serde_json::from_slice(&bytes)?;
        Ok(Some(record))
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load an entry through the cache, populating it on a miss.
    ///
    /// The disk read and the cache fill happen under the write lock, so a
    /// concurrent `put` either lands before the read or invalidates after
    /// the fill; the cache never keeps an entry older than the record.
    fn load(&self, kind: ResourceKind, key: &str) -> Result<CachedEntry, MemdriftError> {
        if let Some(entry) = self.cache.get(kind, key) {
            return Ok(entry);
        }

        let _guard = self.lock_writes();
        if let Some(entry) = self.cache.get(kind, key) {
            return Ok(entry);
        }

        let record = self
            .read_record(kind, key)?
            .ok_or_else(|| MemdriftError::NotFound {
                kind,
                key: key.to_string(),
            })?;
        let content = STANDARD
            .decode(record.content.as_bytes())
            .map_err(|e| MemdriftError::Serialization(format!("Bad content encoding for {}: {}", key, e)))?;

        tracing::debug!(%kind, key, bytes = content.len(), "loaded from disk");
        let entry = CachedEntry {
            content,
            headers: record.headers,
            error: record.error,
        };
        self.cache.insert(kind, key, entry.clone());
        Ok(entry)
    }

    /// Persist a record, then add its key to the index if the index lacks it.
    ///
    /// The record lands before the index, so an interrupted write never lists
    /// a key that cannot be read. Newness is decided by the index, so retrying
    /// after such an interruption still indexes the key.
    fn write_record(&self, kind: ResourceKind, record: StoredRecord) -> Result<bool, MemdriftError> {
        let _guard = self.lock_writes();

        self.cache.invalidate(kind, &record.key);

        let dir = self.namespace_dir(kind);
        let mut index = self.read_index(kind)?;
        let is_new = !index.iter().any(|k| k == &record.key);
        write_atomic(
            &dir,
            &self.record_path(kind, &record.key),
            &serde_json::to_vec(&record)?,
        )?;

        if is_new {
            index.push(record.key);
            write_atomic(&dir, &self.index_path(kind), &serde_json::to_vec(&index)?)?;
        }
        Ok(is_new)
    }

    fn read_index(&self, kind: ResourceKind) -> Result<Vec<String>, MemdriftError> {
        match fs::read(self.index_path(kind)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(MemdriftError::Storage(format!(
                "Failed to read {} index: {}",
                kind, e
            ))),
        }
    }
}

impl ContentStore for FileStore {
    fn put(
        &self,
        kind: ResourceKind,
        key: &str,
        content: &[u8],
        headers: &Headers,
    ) -> Result<(), MemdriftError> {
        let is_new = self.write_record(
            kind,
            StoredRecord {
                key: key.to_string(),
                content: STANDARD.encode(content),
                headers: headers.clone(),
                error: None,
            },
        )?;
        tracing::debug!(%kind, key, bytes = content.len(), is_new, "stored");
        Ok(())
    }

    fn put_error(
        &self,
        kind: ResourceKind,
        key: &str,
        headers: &Headers,
        message: &str,
    ) -> Result<(), MemdriftError> {
        let is_new = self.write_record(
            kind,
            StoredRecord {
                key: key.to_string(),
                content: String::new(),
                headers: headers.clone(),
                error: Some(message.to_string()),
            },
        )?;
        tracing::debug!(%kind, key, message, is_new, "stored failure");
        Ok(())
    }

    fn get_error(&self, kind: ResourceKind, key: &str) -> Result<Option<String>, MemdriftError> {
        self.load(kind, key).map(|entry| entry.error)
    }

    fn get_content(&self, kind: ResourceKind, key: &str) -> Result<Vec<u8>, MemdriftError> {
        self.load(kind, key).map(|entry| entry.content)
    }

    fn get_headers(&self, kind: ResourceKind, key: &str) -> Result<Headers, MemdriftError> {
        self.load(kind, key).map(|entry| entry.headers)
    }

    fn contains(&self, kind: ResourceKind, key: &str) -> Result<bool, MemdriftError> {
        Ok(self.record_path(kind, key).exists())
    }

    fn keys(&self, kind: ResourceKind) -> Result<Vec<String>, MemdriftError> {
        self.read_index(kind)
    }
}

/// Atomically write `data` to `path` via a temporary file in `dir`.
fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> Result<(), MemdriftError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        MemdriftError::Storage(format!("Failed to create temp file in {}: {}", dir.display(), e))
    })?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| {
        MemdriftError::Storage(format!("Failed to persist {}: {}", path.display(), e.error))
    })?;
    Ok(())
}
