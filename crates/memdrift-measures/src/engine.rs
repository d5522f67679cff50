// crates/memdrift-measures/src/engine.rs
//
// Across-TimeMap scoring driver.
//
// For every TimeMap in the collection, each listed Memento is scored against
// the TimeMap's baseline Memento and the result is merged into a score
// report under `timemaps[urit][urim][measure]`.

use std::sync::Arc;

use memdrift_core::{ContentStore, MemdriftError};
use memdrift_store::CollectionModel;

use crate::document::Document;
use crate::options::{MeasureKind, MeasureOptions};
use crate::registry::comparator;
use crate::report::ScoreReport;

/// Score one measure across every TimeMap into a fresh report.
fn score_measure<S: ContentStore>(
    model: &CollectionModel<S>,
    kind: MeasureKind,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    options.validate()?;
    let measure = comparator(kind);
    let mut partial = ScoreReport::new();

    for urit in model.timemap_uris()? {
        let view = match model.timemap(&urit) {
            Ok(view) => view,
            Err(MemdriftError::TimeMapError { message, .. }) => {
                tracing::warn!(urit = %urit, %message, "skipping TimeMap recorded as failed");
                continue;
            }
            Err(e) => return Err(e),
        };
        let Some(baseline_ref) = view.baseline() else {
            tracing::debug!(urit = %urit, "TimeMap lists no mementos, nothing to score");
            continue;
        };
        let baseline = match model.memento_content(&baseline_ref.uri) {
            Ok(content) => Document::prepare(&content, options),
            Err(MemdriftError::MementoError { message, .. }) => {
                tracing::warn!(
                    urit = %urit,
                    urim = %baseline_ref.uri,
                    %message,
                    "baseline Memento recorded as failed, skipping TimeMap"
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        for memento in view.mementos().list {
            let score = if memento.uri == baseline_ref.uri {
                measure.compare(&baseline, &baseline)
            } else {
                let content = match model.memento_content(&memento.uri) {
                    Ok(content) => content,
                    Err(MemdriftError::MementoError { message, .. }) => {
                        tracing::warn!(
                            urit = %urit,
                            urim = %memento.uri,
                            %message,
                            "skipping Memento recorded as failed"
                        );
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                measure.compare(&baseline, &Document::prepare(&content, options))
            };
            tracing::debug!(
                urit = %urit,
                urim = %memento.uri,
                measure = %kind,
                score = score.comparison.as_f64(),
                "scored memento"
            );
            partial.insert(&urit, &memento.uri, kind, score);
        }
    }

    tracing::info!(measure = %kind, timemaps = partial.timemaps.len(), "measure complete");
    Ok(partial)
}

/// Apply one measure and merge its scores into `report`.
///
/// Scores are merged only when the whole pass succeeds: on error `report`
/// is left exactly as it was, including everything earlier calls added.
pub fn apply<S: ContentStore>(
    model: &CollectionModel<S>,
    report: &mut ScoreReport,
    kind: MeasureKind,
    options: MeasureOptions,
) -> Result<(), MemdriftError> {
    let partial = score_measure(model, kind, options)?;
    report.merge(partial);
    Ok(())
}

/// Apply one measure on top of an optional prior report and return the result.
pub fn compute_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    kind: MeasureKind,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    let mut report = scores.unwrap_or_default();
    apply(model, &mut report, kind, options)?;
    Ok(report)
}

pub fn compute_bytecount_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::ByteCount, options)
}

pub fn compute_wordcount_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::WordCount, options)
}

pub fn compute_jaccard_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::Jaccard, options)
}

pub fn compute_sorensen_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::Sorensen, options)
}

pub fn compute_levenshtein_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::Levenshtein, options)
}

pub fn compute_nlevenshtein_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::NLevenshtein, options)
}

pub fn compute_cosine_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::Cosine, options)
}

pub fn compute_tfintersection_across_timemaps<S: ContentStore>(
    model: &CollectionModel<S>,
    scores: Option<ScoreReport>,
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    compute_across_timemaps(model, scores, MeasureKind::TfIntersection, options)
}

/// Run several measures at once, one blocking worker per measure.
///
/// Each worker scores into its own report; the reports are merged in the
/// order of `kinds` once all workers finish. Measures write disjoint keys, so
/// the outcome equals running them one after another. The collection must
/// not be modified while this runs.
pub async fn score_concurrently<S: ContentStore + 'static>(
    model: Arc<CollectionModel<S>>,
    kinds: &[MeasureKind],
    options: MeasureOptions,
) -> Result<ScoreReport, MemdriftError> {
    options.validate()?;

    let handles: Vec<_> = kinds
        .iter()
        .map(|&kind| {
            let model = Arc::clone(&model);
            tokio::task::spawn_blocking(move || score_measure(&model, kind, options))
        })
        .collect();

    let mut report = ScoreReport::new();
    for handle in handles {
        let partial = handle
            .await
            .map_err(|e| MemdriftError::Worker(e.to_string()))??;
        report.merge(partial);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdrift_core::Headers;
    use memdrift_store::MemoryStore;

    const TIMEMAP: &str = r#"<original1>; rel="original",
<memento11>; rel="first memento"; datetime="Tue, 21 Jan 2016 15:45:06 GMT",
<memento12>; rel="last memento"; datetime="Tue, 21 Jan 2017 15:45:06 GMT"
"#;

    fn model() -> CollectionModel<MemoryStore> {
        let cm = CollectionModel::with_store(MemoryStore::new());
        cm.add_timemap("timemap1", TIMEMAP, &Headers::new()).unwrap();
        cm.add_memento("memento11", b"the quick brown fox", &Headers::new())
            .unwrap();
        cm.add_memento("memento12", b"the quick brown fox jumps", &Headers::new())
            .unwrap();
        cm
    }

    #[test]
    fn stemming_without_tokenize_fails_before_scoring() {
        let cm = model();
        let err = compute_jaccard_across_timemaps(&cm, None, MeasureOptions::new(false, true))
            .unwrap_err();
        assert!(matches!(err, MemdriftError::InvalidConfiguration(_)));
    }

    #[test]
    fn baseline_scores_itself_as_identity() {
        let cm = model();
        let report =
            compute_bytecount_across_timemaps(&cm, None, MeasureOptions::default()).unwrap();
        let baseline = report
            .get("timemap1", "memento11", MeasureKind::ByteCount)
            .unwrap();
        assert!(baseline.comparison.is_zero());
        let other = report
            .get("timemap1", "memento12", MeasureKind::ByteCount)
            .unwrap();
        assert!(other.comparison.as_f64() > 0.0);
    }

    #[test]
    fn failing_call_keeps_prior_scores() {
        let cm = model();
        let mut report = ScoreReport::new();
        apply(&cm, &mut report, MeasureKind::Jaccard, MeasureOptions::default()).unwrap();
        let before = report.clone();

        // A TimeMap referencing a memento that was never ingested.
        cm.add_timemap(
            "timemap2",
            r#"<memento21>; rel="first last memento"; datetime="Tue, 21 Mar 2016 15:45:06 GMT""#,
            &Headers::new(),
        )
        .unwrap();
        let err = apply(&cm, &mut report, MeasureKind::Sorensen, MeasureOptions::default())
            .unwrap_err();
        assert!(matches!(err, MemdriftError::NoSuchMemento(ref urim) if urim == "memento21"));
        assert_eq!(report, before);
    }

    #[test]
    fn empty_timemap_is_skipped() {
        let cm = CollectionModel::with_store(MemoryStore::new());
        cm.add_timemap("empty", r#"<o>; rel="original""#, &Headers::new())
            .unwrap();
        let report =
            compute_levenshtein_across_timemaps(&cm, None, MeasureOptions::default()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn baseline_without_first_tag_uses_list_order() {
        let cm = CollectionModel::with_store(MemoryStore::new());
        cm.add_timemap(
            "t",
            r#"<a>; rel="memento"; datetime="Tue, 21 Jan 2016 15:45:06 GMT",
<b>; rel="memento"; datetime="Tue, 21 Jan 2017 15:45:06 GMT""#,
            &Headers::new(),
        )
        .unwrap();
        cm.add_memento("a", b"aaaa", &Headers::new()).unwrap();
        cm.add_memento("b", b"aa", &Headers::new()).unwrap();

        let report =
            compute_bytecount_across_timemaps(&cm, None, MeasureOptions::default()).unwrap();
        assert!(report.get("t", "a", MeasureKind::ByteCount).unwrap().comparison.is_zero());
        assert_eq!(
            report.get("t", "b", MeasureKind::ByteCount).unwrap().comparison.as_f64(),
            -0.5
        );
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let cm = Arc::new(model());
        let options = MeasureOptions::new(true, true);

        let concurrent = score_concurrently(Arc::clone(&cm), &MeasureKind::ALL, options)
            .await
            .unwrap();

        let mut sequential = ScoreReport::new();
        for kind in MeasureKind::ALL {
            apply(&cm, &mut sequential, kind, options).unwrap();
        }
        assert_eq!(concurrent, sequential);
    }

    #[tokio::test]
    async fn concurrent_rejects_invalid_options() {
        let cm = Arc::new(model());
        let err = score_concurrently(cm, &MeasureKind::DEFAULTS, MeasureOptions::new(false, true))
            .await
            .unwrap_err();
        assert!(matches!(err, MemdriftError::InvalidConfiguration(_)));
    }
}
