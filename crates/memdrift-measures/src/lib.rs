// crates/memdrift-measures/src/lib.rs
//
// memdrift-measures: Similarity measures and drift scoring for Memdrift.
//
// Each measure compares a Memento against its TimeMap's baseline Memento and
// yields a divergence score. The engine applies one measure across every
// TimeMap of a collection and merges the results into a nested score report,
// so any subset of measures can be run in any order.

pub mod algorithms;
pub mod document;
pub mod engine;
pub mod options;
pub mod registry;
pub mod report;

pub use document::Document;
pub use engine::{
    apply, compute_across_timemaps, compute_bytecount_across_timemaps,
    compute_cosine_across_timemaps, compute_jaccard_across_timemaps,
    compute_levenshtein_across_timemaps, compute_nlevenshtein_across_timemaps,
    compute_sorensen_across_timemaps, compute_tfintersection_across_timemaps,
    compute_wordcount_across_timemaps, score_concurrently,
};
pub use options::{MeasureKind, MeasureOptions};
pub use registry::{comparator, PairComparator};
pub use report::{MeasureScore, ScoreReport, ScoreValue};
