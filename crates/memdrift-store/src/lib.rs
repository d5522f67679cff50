// crates/memdrift-store/src/lib.rs
//
// memdrift-store: Storage layer for Memdrift.
//
// Provides the file-backed content store (one working directory per
// collection, atomic per-key writes), an explicit in-memory read cache with
// invalidate-on-write semantics, an in-memory store for tests, and the
// Collection Model that every similarity measure reads through.

pub mod cache;
pub mod collection;
pub mod fs;
pub mod memory;

// Re-export key types for ergonomic access from downstream crates.
pub use cache::{CachedEntry, ContentCache};
pub use collection::{CollectionModel, MementoListing, RecordedError, TimeMapView};
pub use fs::FileStore;
pub use memory::MemoryStore;
