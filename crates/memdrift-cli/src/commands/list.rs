// crates/memdrift-cli/src/commands/list.rs
//
// `memdrift list`: summarize every TimeMap in the collection.

use clap::Args;
use memdrift_store::CollectionModel;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_json, format_table, OutputFormat};

#[derive(Debug, Args)]
pub struct ListCmd {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// One summary row per TimeMap.
#[derive(Debug, Tabled, Serialize)]
pub struct TimeMapRow {
    #[tabled(rename = "URI-T")]
    pub urit: String,
    #[tabled(rename = "Mementos")]
    pub mementos: usize,
    #[tabled(rename = "Missing")]
    pub missing: usize,
    #[tabled(rename = "Baseline")]
    pub baseline: String,
}

pub fn collect_rows(model: &CollectionModel) -> Result<Vec<TimeMapRow>, Box<dyn std::error::Error>> {
    let mut rows = Vec::new();
    for urit in model.timemap_uris()? {
        if let Some(recorded) = model.timemap_error(&urit)? {
            rows.push(TimeMapRow {
                urit,
                mementos: 0,
                missing: 0,
                baseline: format!("(failed: {})", recorded.message),
            });
            continue;
        }
        let view = model.timemap(&urit)?;
        let missing = model.missing_mementos(&urit)?.len();
        rows.push(TimeMapRow {
            mementos: view.mementos().count,
            missing,
            baseline: view
                .baseline()
                .map(|m| m.uri.clone())
                .unwrap_or_else(|| "-".to_string()),
            urit,
        });
    }
    Ok(rows)
}

/// Run the list command.
pub async fn run(cmd: &ListCmd, model: &CollectionModel) -> Result<(), Box<dyn std::error::Error>> {
    let rows = collect_rows(model)?;
    match OutputFormat::from_json_flag(cmd.json) {
        OutputFormat::Json => println!("{}", format_json(&rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No TimeMaps in collection.");
            } else {
                println!("{}", format_table(&rows));
            }
        }
    }
    Ok(())
}
