use std::sync::Arc;

use crate::completion::{TitleCandidate, TitleSearch};
use crate::core::CompletionEstimate;
use crate::error::{LibraryStatsError, Result};

const MINUTES_PER_HOUR: f64 = 60.0;

/// Candidate with the strictly highest similarity; on ties the first one seen wins
pub fn select_best(candidates: &[TitleCandidate]) -> Option<&TitleCandidate> {
    let mut best: Option<&TitleCandidate> = None;

    for candidate in candidates {
        match best {
            Some(current) if candidate.similarity > current.similarity => best = Some(candidate),
            None if !candidate.similarity.is_nan() => best = Some(candidate),
            _ => {}
        }
    }

    best
}

/// Resolves a title name to a completion time through a [`TitleSearch`] backend
pub struct CompletionEstimator {
    search: Arc<dyn TitleSearch>,
}

impl CompletionEstimator {
    pub fn new(search: Arc<dyn TitleSearch>) -> Self {
        Self { search }
    }

    /// Completion time in minutes for the best match of `name`
    ///
    /// Fails with `NoMatchFound` when the backend has no candidates and with
    /// `NoCompletionData` when the best candidate has no usable figure.
    pub async fn estimate(&self, name: &str) -> Result<CompletionEstimate> {
        let candidates = self.search.search(name).await?;
        tracing::debug!(
            "{} returned {} candidates for '{}'",
            self.search.name(),
            candidates.len(),
            name
        );

        let best = select_best(&candidates)
            .ok_or_else(|| LibraryStatsError::NoMatchFound(name.to_string()))?;

        let hours = best
            .completion_hours
            .filter(|h| h.is_finite() && *h > 0.0)
            .ok_or_else(|| LibraryStatsError::NoCompletionData {
                title: best.candidate_name.clone(),
                link: best.reference_link.clone(),
            })?;

        tracing::debug!(
            "'{}' matched '{}' ({:.2}): {}h",
            name,
            best.candidate_name,
            best.similarity,
            hours
        );

        Ok(CompletionEstimate::known(hours * MINUTES_PER_HOUR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSearch(Vec<TitleCandidate>);

    #[async_trait]
    impl TitleSearch for FixedSearch {
        async fn search(&self, _name: &str) -> Result<Vec<TitleCandidate>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn candidate(name: &str, similarity: f64, hours: Option<f64>) -> TitleCandidate {
        TitleCandidate::new(name, similarity, hours, format!("https://hltb.test/{}", name))
    }

    fn estimator(candidates: Vec<TitleCandidate>) -> CompletionEstimator {
        CompletionEstimator::new(Arc::new(FixedSearch(candidates)))
    }

    #[test]
    fn test_select_best_keeps_first_on_tie() {
        let candidates = vec![
            candidate("a", 0.9, Some(30.0)),
            candidate("b", 0.95, Some(40.0)),
            candidate("c", 0.95, Some(20.0)),
        ];

        let best = select_best(&candidates).unwrap();
        assert_eq!(best.candidate_name, "b");
    }

    #[test]
    fn test_select_best_skips_nan() {
        let candidates = vec![candidate("nan", f64::NAN, Some(1.0)), candidate("ok", 0.1, None)];
        assert_eq!(select_best(&candidates).unwrap().candidate_name, "ok");
        assert!(select_best(&[]).is_none());
    }

    #[tokio::test]
    async fn test_estimate_converts_hours() {
        let estimate = estimator(vec![
            candidate("a", 0.9, Some(30.0)),
            candidate("b", 0.95, Some(40.0)),
            candidate("c", 0.95, Some(20.0)),
        ])
        .estimate("b")
        .await
        .unwrap();

        assert_eq!(estimate, CompletionEstimate::known(2400.0));
    }

    #[tokio::test]
    async fn test_estimate_without_candidates() {
        let err = estimator(Vec::new()).estimate("Obscure Game").await.unwrap_err();
        assert!(matches!(err, LibraryStatsError::NoMatchFound(name) if name == "Obscure Game"));
    }

    #[tokio::test]
    async fn test_estimate_without_completion_data() {
        let err = estimator(vec![
            candidate("best", 0.99, None),
            candidate("worse", 0.5, Some(12.0)),
        ])
        .estimate("best")
        .await
        .unwrap_err();

        match err {
            LibraryStatsError::NoCompletionData { title, link } => {
                assert_eq!(title, "best");
                assert_eq!(link, "https://hltb.test/best");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_estimate_zero_hours_is_missing_data() {
        let err = estimator(vec![candidate("a", 1.0, Some(0.0))])
            .estimate("a")
            .await
            .unwrap_err();
        assert!(err.is_soft());
    }
}
