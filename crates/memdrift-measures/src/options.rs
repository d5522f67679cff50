// crates/memdrift-measures/src/options.rs
//
// Measure selection and preprocessing options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use memdrift_core::MemdriftError;

/// Preprocessing applied identically to the baseline and every other document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureOptions {
    /// Split documents into word tokens instead of comparing characters.
    #[serde(default)]
    pub tokenize: bool,
    /// Reduce each token to its stem. Requires `tokenize`.
    #[serde(default)]
    pub stemming: bool,
}

impl MeasureOptions {
    pub fn new(tokenize: bool, stemming: bool) -> Self {
        Self { tokenize, stemming }
    }

    /// Reject contradictory options: stemming needs tokens to stem.
    pub fn validate(&self) -> Result<(), MemdriftError> {
        if self.stemming && !self.tokenize {
            return Err(MemdriftError::InvalidConfiguration(
                "stemming requires tokenize".to_string(),
            ));
        }
        Ok(())
    }
}

/// The available similarity measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    ByteCount,
    WordCount,
    Jaccard,
    Sorensen,
    Levenshtein,
    NLevenshtein,
    Cosine,
    TfIntersection,
}

impl MeasureKind {
    /// Every measure.
    pub const ALL: [MeasureKind; 8] = [
        MeasureKind::ByteCount,
        MeasureKind::WordCount,
        MeasureKind::Jaccard,
        MeasureKind::Sorensen,
        MeasureKind::Levenshtein,
        MeasureKind::NLevenshtein,
        MeasureKind::Cosine,
        MeasureKind::TfIntersection,
    ];

    /// Measures enabled when none are requested explicitly.
    pub const DEFAULTS: [MeasureKind; 6] = [
        MeasureKind::ByteCount,
        MeasureKind::WordCount,
        MeasureKind::Jaccard,
        MeasureKind::Sorensen,
        MeasureKind::Levenshtein,
        MeasureKind::NLevenshtein,
    ];

    /// Name used in score reports and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            MeasureKind::ByteCount => "bytecount",
            MeasureKind::WordCount => "wordcount",
            MeasureKind::Jaccard => "jaccard",
            MeasureKind::Sorensen => "sorensen",
            MeasureKind::Levenshtein => "levenshtein",
            MeasureKind::NLevenshtein => "nlevenshtein",
            MeasureKind::Cosine => "cosine",
            MeasureKind::TfIntersection => "tfintersection",
        }
    }

    /// Whether the measure also reports a per-document statistic.
    pub fn has_individual_score(&self) -> bool {
        matches!(self, MeasureKind::ByteCount | MeasureKind::WordCount)
    }

    /// Parse a comma-separated list such as `bytecount,jaccard`.
    pub fn parse_list(list: &str) -> Result<Vec<MeasureKind>, MemdriftError> {
        let mut kinds = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let kind: MeasureKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeasureKind {
    type Err = MemdriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        MeasureKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| {
                MemdriftError::InvalidConfiguration(format!("unknown measure: {}", s))
            })
    }
}
