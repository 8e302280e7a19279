use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::completion::{CompletionEstimator, TitleSearch};
use crate::core::{completion_ratio, CompletionEstimate, EnrichedRecord, LibraryEntry};
use crate::error::{LibraryStatsError, Result};
use crate::export;
use crate::providers::GameStore;

/// Per-title result of a batch run
#[derive(Debug)]
pub enum TitleOutcome {
    Enriched(EnrichedRecord),
    Skipped {
        id: u64,
        name: String,
        error: LibraryStatsError,
    },
}

/// Everything a batch run produced, in library order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<TitleOutcome>,
}

impl BatchReport {
    pub fn records(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TitleOutcome::Enriched(record) => Some(record),
            TitleOutcome::Skipped { .. } => None,
        })
    }

    pub fn into_records(self) -> Vec<EnrichedRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                TitleOutcome::Enriched(record) => Some(record),
                TitleOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, TitleOutcome::Skipped { .. }))
            .count()
    }
}

/// Library enrichment orchestrator
pub struct LibraryEngine {
    store: Arc<dyn GameStore>,
    estimator: CompletionEstimator,
}

impl LibraryEngine {
    pub fn new(store: Arc<dyn GameStore>, search: Arc<dyn TitleSearch>) -> Self {
        Self {
            store,
            estimator: CompletionEstimator::new(search),
        }
    }

    /// Owned titles of `user_id`; an error here aborts the run
    pub async fn fetch_library(&self, user_id: &str) -> Result<Vec<LibraryEntry>> {
        let library = self.store.owned_games(user_id).await?;
        tracing::info!(
            "Provider {} listed {} titles for {}",
            self.store.name(),
            library.len(),
            user_id
        );
        Ok(library)
    }

    /// Build one enriched record; catalog and review failures are returned,
    /// completion-time failures only leave the completion fields empty
    pub async fn synthesize(
        &self,
        id: u64,
        play_time_minutes: u64,
        name: &str,
    ) -> Result<EnrichedRecord> {
        let catalog = self.store.catalog_info(id).await?;
        let reviews = self.store.review_summary(id).await?;

        let estimate = match self.estimator.estimate(name).await {
            Ok(estimate) => estimate,
            Err(e) => {
                if e.is_soft() {
                    tracing::info!("No completion time for {} [{}]: {}", name, id, e);
                } else {
                    tracing::warn!("Completion search failed for {} [{}]: {}", name, id, e);
                }
                CompletionEstimate::unknown()
            }
        };

        let review_ratio = reviews.ratio();
        if review_ratio.is_none() {
            tracing::info!("{} [{}] has no reviews yet", name, id);
        }

        let completion_time_minutes = estimate.minutes;

        Ok(EnrichedRecord {
            id,
            name: name.to_string(),
            genres: catalog.genres,
            review_ratio,
            completion_time_minutes,
            play_time_minutes,
            completion_ratio: completion_ratio(play_time_minutes, completion_time_minutes),
        })
    }

    /// Enrich every title in order, one at a time
    pub async fn process(&self, library: &[LibraryEntry]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, entry) in library.iter().enumerate() {
            tracing::debug!("[{}/{}] {}", index + 1, library.len(), entry.display_name());

            let outcome = match self
                .synthesize(entry.id, entry.play_time_minutes, &entry.name)
                .await
            {
                Ok(record) => TitleOutcome::Enriched(record),
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", entry.display_name(), error);
                    TitleOutcome::Skipped {
                        id: entry.id,
                        name: entry.name.clone(),
                        error,
                    }
                }
            };

            report.outcomes.push(outcome);
        }

        report
    }

    /// Fetch, enrich and export the whole library of `user_id`
    pub async fn run(&self, user_id: &str, output: &Path) -> Result<BatchReport> {
        let start = Instant::now();

        let library = self.fetch_library(user_id).await?;
        let report = self.process(&library).await;

        let records: Vec<&EnrichedRecord> = report.records().collect();
        export::write_csv(output, records.iter().copied())?;

        tracing::info!(
            "Exported {} records ({} skipped) to {} in {:.1}s",
            records.len(),
            report.skipped(),
            output.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(report)
    }
}
