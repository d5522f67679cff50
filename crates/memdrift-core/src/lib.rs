// crates/memdrift-core/src/lib.rs
//
// memdrift-core: Core types, errors, and traits for Memdrift.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the TimeMap data model and its Link-format parser, the ordered
// header mapping shared by TimeMaps and Mementos, the workspace error type,
// and the storage trait the Collection Model is built on.

pub mod error;
pub mod headers;
pub mod parse;
pub mod timemap;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use memdrift_core::TimeMap;`

// TimeMap types
pub use timemap::{MementoRef, Relation, SelfLink, TimeMap};

// Parser
pub use parse::parse_timemap;

// Header mapping
pub use headers::Headers;

// Error types
pub use error::{MemdriftError, TimeMapParseError};

// Traits
pub use traits::{ContentStore, ResourceKind};
