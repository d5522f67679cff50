// crates/memdrift-cli/src/commands/score.rs
//
// `memdrift score`: run similarity measures across every TimeMap and emit
// the score report as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use memdrift_measures::{
    apply, score_concurrently, MeasureKind, MeasureOptions, ScoreReport,
};
use memdrift_store::CollectionModel;

use crate::config::CliConfig;
use crate::output::{emit, format_json};

#[derive(Debug, Args)]
pub struct ScoreCmd {
    /// Comma-separated measures, e.g. "cosine,jaccard". Defaults to the configured set.
    #[arg(long)]
    pub measures: Option<String>,

    /// Compare word tokens instead of characters.
    #[arg(long)]
    pub tokenize: bool,

    /// Stem tokens before comparing. Requires --tokenize.
    #[arg(long)]
    pub stemming: bool,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Run measures one after another instead of in parallel.
    #[arg(long)]
    pub sequential: bool,
}

impl ScoreCmd {
    /// Measures to run: flags first, then configuration, then defaults.
    pub fn kinds(&self, config: &CliConfig) -> Result<Vec<MeasureKind>, Box<dyn std::error::Error>> {
        match &self.measures {
            Some(list) => Ok(MeasureKind::parse_list(list)?),
            None => Ok(config.measure_kinds()?),
        }
    }

    pub fn options(&self, config: &CliConfig) -> MeasureOptions {
        let configured = config.measure_options();
        MeasureOptions::new(
            self.tokenize || configured.tokenize,
            self.stemming || configured.stemming,
        )
    }
}

/// Run the score command.
pub async fn run(
    cmd: &ScoreCmd,
    config: &CliConfig,
    model: Arc<CollectionModel>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = cmd.kinds(config)?;
    let options = cmd.options(config);
    options.validate()?;

    tracing::info!(
        measures = ?kinds.iter().map(|k| k.name()).collect::<Vec<_>>(),
        tokenize = options.tokenize,
        stemming = options.stemming,
        "scoring collection"
    );

    let report = if cmd.sequential {
        let mut report = ScoreReport::new();
        for kind in &kinds {
            apply(&*model, &mut report, *kind, options)?;
        }
        report
    } else {
        score_concurrently(model, &kinds, options).await?
    };

    let output = cmd
        .output
        .clone()
        .or_else(|| config.output.as_ref().map(PathBuf::from));
    emit(&format_json(&report)?, output.as_deref())?;
    if let Some(path) = &output {
        tracing::info!(path = %path.display(), "wrote score report");
    }
    Ok(())
}
