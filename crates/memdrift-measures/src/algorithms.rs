// crates/memdrift-measures/src/algorithms.rs
//
// Pure set, sequence, and vector-space comparisons over preprocessed units.
//
// Every function returns exactly zero when both inputs are equal; callers rely
// on self-comparison yielding the identity to validate a measure.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Number of most frequent terms compared by [`top_terms_missing`].
pub const TOP_TERMS: usize = 20;

/// Relative change of a count against the baseline: `(value - baseline) / baseline`.
///
/// Negative when the document is smaller than the baseline. A zero baseline
/// yields 0.0.
pub fn relative_change(value: usize, baseline: usize) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    (value as f64 - baseline as f64) / baseline as f64
}

/// Jaccard distance: `1 - |A ∩ B| / |A ∪ B|` over the sets of units.
pub fn jaccard_distance<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let set_a: HashSet<&T> = a.iter().collect();
    let set_b: HashSet<&T> = b.iter().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    1.0 - intersection as f64 / union as f64
}

/// Sørensen–Dice distance: `1 - 2|A ∩ B| / (|A| + |B|)` over the sets of units.
pub fn sorensen_distance<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let set_a: HashSet<&T> = a.iter().collect();
    let set_b: HashSet<&T> = b.iter().collect();
    let total = set_a.len() + set_b.len();
    if total == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    1.0 - (2 * intersection) as f64 / total as f64
}

/// Slice view that `strsim::generic_levenshtein` can iterate by reference.
struct Units<'s, T>(&'s [T]);

impl<'w, 's, T> IntoIterator for &'w Units<'s, T> {
    type Item = &'s T;
    type IntoIter = std::slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Edit distance between two unit sequences (insertions, deletions,
/// substitutions of whole units).
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    strsim::generic_levenshtein(&Units(a), &Units(b))
}

/// Edit distance divided by the length of the longer sequence, in [0, 1].
pub fn normalized_levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

/// Term frequencies of a unit sequence.
pub fn term_frequencies<T: Eq + Hash>(units: &[T]) -> HashMap<&T, u64> {
    let mut counts = HashMap::new();
    for unit in units {
        *counts.entry(unit).or_insert(0u64) += 1;
    }
    counts
}

/// Cosine distance `1 - cos(tf_a, tf_b)` between term-frequency vectors.
///
/// Two empty documents are identical (0.0); an empty document against a
/// non-empty one is maximally distant (1.0).
pub fn cosine_distance<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 0.0,
        (true, false) | (false, true) => return 1.0,
        _ => {}
    }

    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);

    // Integer accumulation keeps identical vectors at exactly 1.0:
    // sqrt(d * d) == d for integral d below 2^53.
    let dot: u64 = tf_a
        .iter()
        .filter_map(|(term, count)| tf_b.get(term).map(|other| count * other))
        .sum();
    let norm_a: u64 = tf_a.values().map(|c| c * c).sum();
    let norm_b: u64 = tf_b.values().map(|c| c * c).sum();

    let cosine = dot as f64 / (norm_a as f64 * norm_b as f64).sqrt();
    (1.0 - cosine).clamp(0.0, 1.0)
}

/// The `k` most frequent terms, ties broken by term order.
pub fn top_terms<T: Eq + Hash + Ord>(units: &[T], k: usize) -> Vec<&T> {
    let mut ranked: Vec<(&T, u64)> = term_frequencies(units).into_iter().collect();
    ranked.sort_by(|(term_a, count_a), (term_b, count_b)| {
        count_b.cmp(count_a).then_with(|| term_a.cmp(term_b))
    });
    ranked.into_iter().take(k).map(|(term, _)| term).collect()
}

/// How many of the baseline's top terms are absent from the document's top terms.
pub fn top_terms_missing<T: Eq + Hash + Ord>(baseline: &[T], document: &[T], k: usize) -> usize {
    let baseline_top = top_terms(baseline, k);
    let document_top: HashSet<&T> = top_terms(document, k).into_iter().collect();
    baseline_top
        .into_iter()
        .filter(|term| !document_top.contains(term))
        .count()
}
