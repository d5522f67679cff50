// crates/memdrift-cli/src/commands/ingest.rs
//
// `memdrift ingest-timemap` and `memdrift ingest-memento`: add captured
// resources to the collection's working directory.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use memdrift_core::Headers;
use memdrift_store::CollectionModel;

/// Add a TimeMap in link format.
#[derive(Debug, Args)]
pub struct IngestTimeMapCmd {
    /// URI-T the TimeMap was fetched from.
    #[arg(long)]
    pub urit: String,

    /// File containing the TimeMap text.
    #[arg(long, required_unless_present = "error", conflicts_with = "error")]
    pub file: Option<PathBuf>,

    /// Record a failed fetch with this message instead of content.
    #[arg(long)]
    pub error: Option<String>,

    /// Response header as "Name: value". Repeatable.
    #[arg(long = "header")]
    pub headers: Vec<String>,
}

/// Add a Memento's captured content.
#[derive(Debug, Args)]
pub struct IngestMementoCmd {
    /// URI-M of the capture.
    #[arg(long)]
    pub urim: String,

    /// File containing the captured bytes.
    #[arg(long, required_unless_present = "error", conflicts_with = "error")]
    pub file: Option<PathBuf>,

    /// Record a failed fetch with this message instead of content.
    #[arg(long)]
    pub error: Option<String>,

    /// Response header as "Name: value". Repeatable.
    #[arg(long = "header")]
    pub headers: Vec<String>,
}

/// Run the ingest-timemap command.
pub async fn run_timemap(
    cmd: &IngestTimeMapCmd,
    model: &CollectionModel,
) -> Result<(), Box<dyn std::error::Error>> {
    let headers = parse_headers(&cmd.headers)?;
    let file = match (&cmd.file, &cmd.error) {
        (_, Some(message)) => {
            model.add_timemap_error(&cmd.urit, &headers, message)?;
            println!("Recorded failed TimeMap {}: {}", cmd.urit, message);
            return Ok(());
        }
        (Some(file), None) => file,
        (None, None) => return Err("either --file or --error is required".into()),
    };

    let raw = fs::read_to_string(file)?;
    model.add_timemap(&cmd.urit, &raw, &headers)?;

    let view = model.timemap(&cmd.urit)?;
    println!("Added TimeMap {}", cmd.urit);
    println!("  Mementos: {}", view.mementos().count);
    if let Some(original) = &view.timemap.original {
        println!("  Original: {}", original);
    }
    Ok(())
}

/// Run the ingest-memento command.
pub async fn run_memento(
    cmd: &IngestMementoCmd,
    model: &CollectionModel,
) -> Result<(), Box<dyn std::error::Error>> {
    let headers = parse_headers(&cmd.headers)?;
    let file = match (&cmd.file, &cmd.error) {
        (_, Some(message)) => {
            model.add_memento_error(&cmd.urim, &headers, message)?;
            println!("Recorded failed Memento {}: {}", cmd.urim, message);
            return Ok(());
        }
        (Some(file), None) => file,
        (None, None) => return Err("either --file or --error is required".into()),
    };

    let content = fs::read(file)?;
    model.add_memento(&cmd.urim, &content, &headers)?;

    println!("Added Memento {} ({} bytes)", cmd.urim, content.len());
    Ok(())
}

/// Parse repeated `--header "Name: value"` arguments, keeping their order.
pub fn parse_headers(lines: &[String]) -> Result<Headers, String> {
    lines
        .iter()
        .map(|line| {
            Headers::parse_line(line).ok_or_else(|| format!("invalid header {:?}, expected \"Name: value\"", line))
        })
        .collect()
}
