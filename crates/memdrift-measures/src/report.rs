// crates/memdrift-measures/src/report.rs
//
// Nested score report:
//   {"timemaps": {URI-T: {URI-M: {measure: {"comparison score": x, "individual score"?: y}}}}}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::MeasureKind;

/// A score that keeps integer measures integral in the serialized report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Integer(u64),
    Float(f64),
}

impl ScoreValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ScoreValue::Integer(v) => *v as f64,
            ScoreValue::Float(v) => *v,
        }
    }

    /// True for the identity value of every measure (0 or 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            ScoreValue::Integer(v) => *v == 0,
            ScoreValue::Float(v) => *v == 0.0,
        }
    }
}

impl From<usize> for ScoreValue {
    fn from(v: usize) -> Self {
        ScoreValue::Integer(v as u64)
    }
}

impl From<f64> for ScoreValue {
    fn from(v: f64) -> Self {
        ScoreValue::Float(v)
    }
}

/// One measure's result for one Memento.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureScore {
    /// Divergence from the baseline Memento.
    #[serde(rename = "comparison score")]
    pub comparison: ScoreValue,
    /// Standalone statistic of this Memento (byte or word count).
    #[serde(
        rename = "individual score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub individual: Option<ScoreValue>,
}

impl MeasureScore {
    pub fn comparison(comparison: impl Into<ScoreValue>) -> Self {
        Self {
            comparison: comparison.into(),
            individual: None,
        }
    }

    pub fn with_individual(comparison: impl Into<ScoreValue>, individual: impl Into<ScoreValue>) -> Self {
        Self {
            comparison: comparison.into(),
            individual: Some(individual.into()),
        }
    }
}

/// Scores of every measure for one Memento.
pub type MementoScores = BTreeMap<MeasureKind, MeasureScore>;

/// Accumulated scores for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub timemaps: BTreeMap<String, BTreeMap<String, MementoScores>>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score, replacing any earlier score for the same triple.
    pub fn insert(&mut self, urit: &str, urim: &str, kind: MeasureKind, score: MeasureScore) {
        self.timemaps
            .entry(urit.to_string())
            .or_default()
            .entry(urim.to_string())
            .or_default()
            .insert(kind, score);
    }

    pub fn get(&self, urit: &str, urim: &str, kind: MeasureKind) -> Option<&MeasureScore> {
        self.timemaps.get(urit)?.get(urim)?.get(&kind)
    }

    /// Scores for every Memento of one TimeMap.
    pub fn timemap(&self, urit: &str) -> Option<&BTreeMap<String, MementoScores>> {
        self.timemaps.get(urit)
    }

    /// Key-wise union. Measures already present for a Memento are kept unless
    /// `other` scores the same measure, in which case `other` wins.
    pub fn merge(&mut self, other: ScoreReport) {
        for (urit, mementos) in other.timemaps {
            let target = self.timemaps.entry(urit).or_default();
            for (urim, scores) in mementos {
                target.entry(urim).or_default().extend(scores);
            }
        }
    }

    /// Iterate over every `(urit, urim, measure, score)` entry.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, MeasureKind, &MeasureScore)> {
        self.timemaps.iter().flat_map(|(urit, mementos)| {
            mementos.iter().flat_map(move |(urim, scores)| {
                scores
                    .iter()
                    .map(move |(kind, score)| (urit.as_str(), urim.as_str(), *kind, score))
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.timemaps.is_empty()
    }
}
