// crates/memdrift-measures/src/registry.rs
//
// Measure registry: one comparator per `MeasureKind`, all behind the same
// interface so the engine can dispatch on the kind alone.

use crate::algorithms;
use crate::document::Document;
use crate::options::MeasureKind;
use crate::report::MeasureScore;

/// Trait for scoring a document against its TimeMap's baseline.
///
/// Implementations are stateless; comparing the baseline with itself must
/// yield the measure's identity (0 or 0.0).
pub trait PairComparator: Send + Sync {
    /// Which measure this comparator implements.
    fn kind(&self) -> MeasureKind;

    /// Score `document` against `baseline`.
    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore;
}

/// Byte length delta relative to the baseline.
#[derive(Debug, Clone, Copy)]
pub struct ByteCount;

/// Word count delta relative to the baseline.
#[derive(Debug, Clone, Copy)]
pub struct WordCount;

#[derive(Debug, Clone, Copy)]
pub struct Jaccard;

#[derive(Debug, Clone, Copy)]
pub struct Sorensen;

#[derive(Debug, Clone, Copy)]
pub struct Levenshtein;

/// Levenshtein distance normalized by the longer document.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedLevenshtein;

/// Cosine distance between term-frequency vectors.
#[derive(Debug, Clone, Copy)]
pub struct Cosine;

/// Baseline top terms missing from the document's top terms.
#[derive(Debug, Clone, Copy)]
pub struct TfIntersection;

impl PairComparator for ByteCount {
    fn kind(&self) -> MeasureKind {
        MeasureKind::ByteCount
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::with_individual(
            algorithms::relative_change(document.byte_len(), baseline.byte_len()),
            document.byte_len(),
        )
    }
}

impl PairComparator for WordCount {
    fn kind(&self) -> MeasureKind {
        MeasureKind::WordCount
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::with_individual(
            algorithms::relative_change(document.word_count(), baseline.word_count()),
            document.word_count(),
        )
    }
}

impl PairComparator for Jaccard {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Jaccard
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::jaccard_distance(
            baseline.units(),
            document.units(),
        ))
    }
}

impl PairComparator for Sorensen {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Sorensen
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::sorensen_distance(
            baseline.units(),
            document.units(),
        ))
    }
}

impl PairComparator for Levenshtein {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Levenshtein
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::levenshtein(baseline.units(), document.units()))
    }
}

impl PairComparator for NormalizedLevenshtein {
    fn kind(&self) -> MeasureKind {
        MeasureKind::NLevenshtein
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::normalized_levenshtein(
            baseline.units(),
            document.units(),
        ))
    }
}

impl PairComparator for Cosine {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Cosine
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::cosine_distance(
            baseline.units(),
            document.units(),
        ))
    }
}

impl PairComparator for TfIntersection {
    fn kind(&self) -> MeasureKind {
        MeasureKind::TfIntersection
    }

    fn compare(&self, baseline: &Document, document: &Document) -> MeasureScore {
        MeasureScore::comparison(algorithms::top_terms_missing(
            baseline.units(),
            document.units(),
            algorithms::TOP_TERMS,
        ))
    }
}

/// Look up the comparator for a measure.
pub fn comparator(kind: MeasureKind) -> &'static dyn PairComparator {
    match kind {
        MeasureKind::ByteCount => &ByteCount,
        MeasureKind::WordCount => &WordCount,
        MeasureKind::Jaccard => &Jaccard,
        MeasureKind::Sorensen => &Sorensen,
        MeasureKind::Levenshtein => &Levenshtein,
        MeasureKind::NLevenshtein => &NormalizedLevenshtein,
        MeasureKind::Cosine => &Cosine,
        MeasureKind::TfIntersection => &TfIntersection,
    }
}
