// crates/memdrift-cli/src/config.rs
//
// Runtime configuration for the Memdrift CLI.
// Loaded from a TOML file or populated with defaults; flags override it.

use serde::Deserialize;
use std::fs;

use memdrift_core::MemdriftError;
use memdrift_measures::{MeasureKind, MeasureOptions};

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Working directory holding the collection's content store.
    #[serde(default = "default_working_directory")]
    pub working_directory: String,

    /// Measures to run when `score` is given none. Empty means the defaults.
    #[serde(default)]
    pub measures: Vec<String>,

    /// Compare word tokens instead of characters.
    #[serde(default)]
    pub tokenize: bool,

    /// Stem tokens before comparing. Requires `tokenize`.
    #[serde(default)]
    pub stemming: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// File to write the score report to. Stdout when unset.
    #[serde(default)]
    pub output: Option<String>,
}

fn default_working_directory() -> String {
    "~/.memdrift/collection".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            working_directory: default_working_directory(),
            measures: Vec::new(),
            tokenize: false,
            stemming: false,
            log_level: default_log_level(),
            output: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Configured measures, or the default set when none are listed.
    pub fn measure_kinds(&self) -> Result<Vec<MeasureKind>, MemdriftError> {
        if self.measures.is_empty() {
            return Ok(MeasureKind::DEFAULTS.to_vec());
        }
        MeasureKind::parse_list(&self.measures.join(","))
    }

    pub fn measure_options(&self) -> MeasureOptions {
        MeasureOptions::new(self.tokenize, self.stemming)
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}
