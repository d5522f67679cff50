// crates/memdrift-cli/src/commands/show.rs
//
// `memdrift show --urit <URI-T>`: print one TimeMap as JSON.

use clap::Args;
use memdrift_store::CollectionModel;

use crate::output::format_json;

#[derive(Debug, Args)]
pub struct ShowCmd {
    /// URI-T of the TimeMap to print.
    #[arg(long)]
    pub urit: String,

    /// Omit the raw Link-format text.
    #[arg(long)]
    pub parsed_only: bool,
}

/// Run the show command.
pub async fn run(cmd: &ShowCmd, model: &CollectionModel) -> Result<(), Box<dyn std::error::Error>> {
    let view = model.timemap(&cmd.urit)?;
    let text = if cmd.parsed_only {
        format_json(&view.timemap)?
    } else {
        format_json(&view)?
    };
    println!("{}", text);
    Ok(())
}
