// crates/memdrift-store/src/collection.rs
//
// Collection Model: the set of TimeMaps and Mementos known to one working
// directory, and the sole gateway between storage and the measures.
//
// The model keeps no copy of its own. TimeMap structure is re-parsed from the
// stored raw text on every read, so it can never disagree with that text.

use std::path::Path;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use memdrift_core::{
    parse_timemap, ContentStore, Headers, MemdriftError, MementoRef, ResourceKind, TimeMap,
};

use crate::fs::FileStore;

/// A TimeMap as returned by the Collection Model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMapView {
    /// The raw Link-format text as ingested.
    pub raw: String,
    /// Headers recorded at ingestion.
    pub headers: Headers,
    /// Structure parsed from `raw`.
    pub timemap: TimeMap,
}

/// Memento entries of a TimeMap with their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MementoListing<'a> {
    pub list: &'a [MementoRef],
    pub count: usize,
}

/// A fetch failure recorded in place of a TimeMap or Memento.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RecordedError {
    pub message: String,
    /// Headers of the failed response, if any were received.
    pub headers: Headers,
}

impl TimeMapView {
    pub fn mementos(&self) -> MementoListing<'_> {
        MementoListing {
            list: &self.timemap.mementos,
            count: self.timemap.mementos.len(),
        }
    }

    /// See [`TimeMap::baseline`].
    pub fn baseline(&self) -> Option<&MementoRef> {
        self.timemap.baseline()
    }
}

// Serialized as `{raw, headers, original, timegate, self, timemaps, mementos: {list, count}}`.
impl Serialize for TimeMapView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Listing<'a> {
            list: &'a [MementoRef],
            count: usize,
        }

        let listing = self.mementos();
        let mut state = serializer.serialize_struct("TimeMapView", 7)?;
        state.serialize_field("raw", &self.raw)?;
        state.serialize_field("headers", &self.headers)?;
        state.serialize_field("original", &self.timemap.original)?;
        state.serialize_field("timegate", &self.timemap.timegate)?;
        state.serialize_field("self", &self.timemap.self_link)?;
        state.serialize_field("timemaps", &self.timemap.timemaps)?;
        state.serialize_field(
            "mementos",
            &Listing {
                list: listing.list,
                count: listing.count,
            },
        )?;
        state.end()
    }
}

/// Aggregates TimeMaps and their Mementos on top of a [`ContentStore`].
#[derive(Debug)]
pub struct CollectionModel<S = FileStore> {
    store: S,
}

impl CollectionModel<FileStore> {
    /// Open (or create) a collection in the given working directory.
    pub fn open(working_directory: impl AsRef<Path>) -> Result<Self, MemdriftError> {
        Ok(Self::with_store(FileStore::open(working_directory)?))
    }
}

impl<S: ContentStore> CollectionModel<S> {
    /// Build a collection over an existing store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse and store a TimeMap.
    ///
    /// Text that does not parse is rejected before anything is written, so the
    /// collection is unaffected by a malformed TimeMap.
    pub fn add_timemap(
        &self,
        urit: &str,
        raw: &str,
        headers: &Headers,
    ) -> Result<(), MemdriftError> {
        let timemap = parse_timemap(raw).map_err(|source| MemdriftError::MalformedTimeMap {
            urit: urit.to_string(),
            source,
        })?;
        self.store
            .put(ResourceKind::TimeMap, urit, raw.as_bytes(), headers)?;
        tracing::info!(urit, mementos = timemap.memento_count(), "added TimeMap");
        Ok(())
    }

    /// Store a Memento's content and headers. Re-adding a URI-M replaces it.
    pub fn add_memento(
        &self,
        urim: &str,
        content: &[u8],
        headers: &Headers,
    ) -> Result<(), MemdriftError> {
        self.store
            .put(ResourceKind::Memento, urim, content, headers)?;
        tracing::debug!(urim, bytes = content.len(), "added Memento");
        Ok(())
    }

    /// Record that fetching a TimeMap failed.
    ///
    /// The URI-T is listed like any other; reading it yields
    /// [`MemdriftError::TimeMapError`] until a TimeMap is added under it.
    pub fn add_timemap_error(
        &self,
        urit: &str,
        headers: &Headers,
        message: &str,
    ) -> Result<(), MemdriftError> {
        self.store
            .put_error(ResourceKind::TimeMap, urit, headers, message)?;
        tracing::warn!(urit, message, "recorded failed TimeMap");
        Ok(())
    }

    /// Record that fetching a Memento failed. Reading its content or headers
    /// yields [`MemdriftError::MementoError`] until content is added.
    pub fn add_memento_error(
        &self,
        urim: &str,
        headers: &Headers,
        message: &str,
    ) -> Result<(), MemdriftError> {
        self.store
            .put_error(ResourceKind::Memento, urim, headers, message)?;
        tracing::warn!(urim, message, "recorded failed Memento");
        Ok(())
    }

    /// The failure recorded for a URI-T, `None` if it holds a TimeMap.
    pub fn timemap_error(&self, urit: &str) -> Result<Option<RecordedError>, MemdriftError> {
        self.recorded_error(ResourceKind::TimeMap, urit)
            .map_err(|e| Self::no_such_timemap(urit, e))
    }

    /// The failure recorded for a URI-M, `None` if it holds content.
    pub fn memento_error(&self, urim: &str) -> Result<Option<RecordedError>, MemdriftError> {
        self.recorded_error(ResourceKind::Memento, urim)
            .map_err(|e| Self::no_such_memento(urim, e))
    }

    fn recorded_error(
        &self,
        kind: ResourceKind,
        key: &str,
    ) -> Result<Option<RecordedError>, MemdriftError> {
        match self.store.get_error(kind, key)? {
            None => Ok(None),
            Some(message) => Ok(Some(RecordedError {
                message,
                headers: self.store.get_headers(kind, key)?,
            })),
        }
    }

    /// URI-Ts in the order they were first added.
    pub fn timemap_uris(&self) -> Result<Vec<String>, MemdriftError> {
        self.store.keys(ResourceKind::TimeMap)
    }

    /// URI-Ms in the order they were first added.
    pub fn memento_uris(&self) -> Result<Vec<String>, MemdriftError> {
        self.store.keys(ResourceKind::Memento)
    }

    /// Fetch a TimeMap's raw text, headers, and parsed structure.
    pub fn timemap(&self, urit: &str) -> Result<TimeMapView, MemdriftError> {
        let no_such = |e: MemdriftError| Self::no_such_timemap(urit, e);
        if let Some(message) = self
            .store
            .get_error(ResourceKind::TimeMap, urit)
            .map_err(no_such)?
        {
            return Err(MemdriftError::TimeMapError {
                urit: urit.to_string(),
                message,
            });
        }
        let bytes = self
            .store
            .get_content(ResourceKind::TimeMap, urit)
            .map_err(no_such)?;
        let headers = self
            .store
            .get_headers(ResourceKind::TimeMap, urit)
            .map_err(no_such)?;
        let raw = String::from_utf8(bytes).map_err(|e| {
            MemdriftError::Serialization(format!("TimeMap {} is not UTF-8: {}", urit, e))
        })?;
        let timemap = parse_timemap(&raw).map_err(|source| MemdriftError::MalformedTimeMap {
            urit: urit.to_string(),
            source,
        })?;

        Ok(TimeMapView {
            raw,
            headers,
            timemap,
        })
    }

    pub fn memento_content(&self, urim: &str) -> Result<Vec<u8>, MemdriftError> {
        self.ensure_captured(urim)?;
        self.store
            .get_content(ResourceKind::Memento, urim)
            .map_err(|e| Self::no_such_memento(urim, e))
    }

    pub fn memento_headers(&self, urim: &str) -> Result<Headers, MemdriftError> {
        self.ensure_captured(urim)?;
        self.store
            .get_headers(ResourceKind::Memento, urim)
            .map_err(|e| Self::no_such_memento(urim, e))
    }

    pub fn has_memento(&self, urim: &str) -> Result<bool, MemdriftError> {
        self.store.contains(ResourceKind::Memento, urim)
    }

    /// Memento entries referenced by a TimeMap that have not been ingested.
    pub fn missing_mementos(&self, urit: &str) -> Result<Vec<String>, MemdriftError> {
        let view = self.timemap(urit)?;
        let mut missing = Vec::new();
        for memento in view.mementos().list {
            if !self.has_memento(&memento.uri)? {
                missing.push(memento.uri.clone());
            }
        }
        Ok(missing)
    }

    fn ensure_captured(&self, urim: &str) -> Result<(), MemdriftError> {
        match self
            .store
            .get_error(ResourceKind::Memento, urim)
            .map_err(|e| Self::no_such_memento(urim, e))?
        {
            None => Ok(()),
            Some(message) => Err(MemdriftError::MementoError {
                urim: urim.to_string(),
                message,
            }),
        }
    }

    fn no_such_timemap(urit: &str, e: MemdriftError) -> MemdriftError {
        match e {
            MemdriftError::NotFound { .. } => MemdriftError::NoSuchTimeMap(urit.to_string()),
            other => other,
        }
    }

    fn no_such_memento(urim: &str, e: MemdriftError) -> MemdriftError {
        match e {
            MemdriftError::NotFound { .. } => MemdriftError::NoSuchMemento(urim.to_string()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    const TIMEMAP: &str = r#"<original1>; rel="original",
<timemap1>; rel="self"; type="application/link-format"; from="Tue, 21 Mar 2016 15:45:06 GMT"; until="Tue, 21 Mar 2018 15:45:12 GMT",
<timegate1>; rel="timegate",
<memento11>; rel="first memento"; datetime="Tue, 21 Jan 2016 15:45:06 GMT",
<memento12>; rel="memento"; datetime="Tue, 21 Jan 2017 15:45:06 GMT",
<memento13>; rel="last memento"; datetime="Tue, 21 Jan 2018 15:45:12 GMT"
"#;

    fn headers() -> Headers {
        vec![("key1", "value1"), ("key2", "value2")]
            .into_iter()
            .collect()
    }

    fn model() -> CollectionModel<MemoryStore> {
        CollectionModel::with_store(MemoryStore::new())
    }

    #[test]
    fn add_and_get_timemap() {
        let cm = model();
        cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();

        assert_eq!(cm.timemap_uris().unwrap(), vec!["timemap1"]);
        let view = cm.timemap("timemap1").unwrap();
        assert_eq!(view.raw, TIMEMAP);
        assert_eq!(view.headers, headers());
        assert_eq!(view.mementos().count, 3);
        assert_eq!(view.baseline().unwrap().uri, "memento11");
        assert_eq!(view.timemap.original.as_deref(), Some("original1"));
    }

    #[test]
    fn malformed_timemap_leaves_collection_untouched() {
        let cm = model();
        cm.add_timemap("good", TIMEMAP, &headers()).unwrap();

        let err = cm
            .add_timemap("bad", r#"<m1>; rel="memento""#, &headers())
            .unwrap_err();
        match err {
            MemdriftError::MalformedTimeMap { urit, .. } => assert_eq!(urit, "bad"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(cm.timemap_uris().unwrap(), vec!["good"]);
    }

    #[test]
    fn unknown_keys_are_typed_errors() {
        let cm = model();
        assert!(matches!(
            cm.timemap("nonexistent"),
            Err(MemdriftError::NoSuchTimeMap(ref k)) if k == "nonexistent"
        ));
        assert!(matches!(
            cm.memento_content("nonexistent"),
            Err(MemdriftError::NoSuchMemento(ref k)) if k == "nonexistent"
        ));
        assert!(matches!(
            cm.memento_headers("nonexistent"),
            Err(MemdriftError::NoSuchMemento(_))
        ));
    }

    #[test]
    fn timemap_reingest_replaces_structure() {
        let cm = model();
        cm.add_timemap("t", TIMEMAP, &headers()).unwrap();
        let single = r#"<m>; rel="first last memento"; datetime="Tue, 21 Jan 2016 15:45:06 GMT""#;
        cm.add_timemap("t", single, &Headers::new()).unwrap();

        let view = cm.timemap("t").unwrap();
        assert_eq!(view.mementos().count, 1);
        assert!(view.headers.is_empty());
        assert_eq!(cm.timemap_uris().unwrap(), vec!["t"]);
    }

    #[test]
    fn mementos_and_missing_references() {
        let cm = model();
        cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();
        cm.add_memento("memento11", b"<html>a</html>", &headers())
            .unwrap();

        assert_eq!(cm.memento_content("memento11").unwrap(), b"<html>a</html>");
        assert_eq!(cm.memento_headers("memento11").unwrap(), headers());
        assert_eq!(
            cm.missing_mementos("timemap1").unwrap(),
            vec!["memento12", "memento13"]
        );
        assert_eq!(cm.memento_uris().unwrap(), vec!["memento11"]);
    }

    #[test]
    fn reads_have_no_side_effects() {
        let cm = model();
        cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();
        let first = cm.timemap("timemap1").unwrap();
        let _ = cm.memento_content("memento12");
        let second = cm.timemap("timemap1").unwrap();
        assert_eq!(first, second);
        assert!(cm.memento_uris().unwrap().is_empty());
    }

    #[test]
    fn file_backed_collection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cm = CollectionModel::open(dir.path()).unwrap();
            cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();
            cm.add_memento("memento11", b"content", &headers()).unwrap();
        }
        let cm = CollectionModel::open(dir.path()).unwrap();
        assert_eq!(cm.timemap_uris().unwrap(), vec!["timemap1"]);
        assert_eq!(cm.memento_content("memento11").unwrap(), b"content");
    }

    #[test]
    fn view_serializes_with_listing() {
        let cm = model();
        cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();
        let json = serde_json::to_value(cm.timemap("timemap1").unwrap()).unwrap();
        assert_eq!(json["mementos"]["count"], 3);
        assert_eq!(json["mementos"]["list"][0]["uri"], "memento11");
        assert_eq!(json["mementos"]["list"][0]["relations"][0], "first");
        assert_eq!(json["self"]["uri"], "timemap1");
    }

    #[test]
    fn recorded_failures_are_listed_and_raise_on_read() {
        let cm = model();
        cm.add_timemap("timemap1", TIMEMAP, &headers()).unwrap();
        cm.add_timemap_error("timemap2", &Headers::new(), "connection refused")
            .unwrap();
        cm.add_memento_error("memento12", &headers(), "HTTP 503").unwrap();

        assert_eq!(cm.timemap_uris().unwrap(), vec!["timemap1", "timemap2"]);
        match cm.timemap("timemap2").unwrap_err() {
            MemdriftError::TimeMapError { urit, message } => {
                assert_eq!(urit, "timemap2");
                assert_eq!(message, "connection refused");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            cm.memento_content("memento12"),
            Err(MemdriftError::MementoError { ref urim, .. }) if urim == "memento12"
        ));
        assert!(cm.memento_headers("memento12").unwrap_err().is_recorded_failure());

        let recorded = cm.memento_error("memento12").unwrap().unwrap();
        assert_eq!(recorded.message, "HTTP 503");
        assert_eq!(recorded.headers, headers());
        assert_eq!(cm.timemap_error("timemap1").unwrap(), None);
        assert!(matches!(
            cm.memento_error("nonexistent"),
            Err(MemdriftError::NoSuchMemento(_))
        ));
        // A recorded failure counts as ingested, not missing.
        assert_eq!(
            cm.missing_mementos("timemap1").unwrap(),
            vec!["memento11", "memento13"]
        );
    }

    #[test]
    fn capture_replaces_recorded_failure() {
        let cm = model();
        cm.add_memento_error("m", &Headers::new(), "timeout").unwrap();
        cm.add_memento("m", b"content", &Headers::new()).unwrap();

        assert_eq!(cm.memento_content("m").unwrap(), b"content");
        assert_eq!(cm.memento_error("m").unwrap(), None);
        assert_eq!(cm.memento_uris().unwrap(), vec!["m"]);
    }
}
