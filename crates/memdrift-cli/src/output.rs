// crates/memdrift-cli/src/output.rs
//
// Output formatting utilities for the Memdrift CLI.
// Supports table and JSON output modes.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Write `text` to `path`, or to stdout when no path is given.
pub fn emit(text: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{}\n", text)),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        name: String,
        count: usize,
    }

    #[test]
    fn table_and_json() {
        let rows = vec![Row {
            name: "timemap1".to_string(),
            count: 3,
        }];
        let table = format_table(&rows);
        assert!(table.contains("timemap1"));
        assert!(table.contains("count"));

        let json = format_json(&rows).unwrap();
        assert!(json.contains("\"count\": 3"));
    }

    #[test]
    fn emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        emit("{}", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
