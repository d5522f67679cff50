// crates/memdrift-cli/src/commands/mod.rs
//
// Command module declarations for the Memdrift CLI.

pub mod ingest;
pub mod list;
pub mod score;
pub mod show;
