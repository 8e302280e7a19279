pub mod estimator;
pub mod howlongtobeat;
pub mod similarity;

use async_trait::async_trait;

use crate::error::Result;

pub use estimator::{select_best, CompletionEstimator};
pub use howlongtobeat::HowLongToBeatSearch;
pub use similarity::title_similarity;

/// Trait for fuzzy title-search backends
#[async_trait]
pub trait TitleSearch: Send + Sync {
    /// Candidates for `name` in the order the backend returned them
    async fn search(&self, name: &str) -> Result<Vec<TitleCandidate>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Candidate title with similarity score and completion figure
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    pub candidate_name: String,

    /// Similarity to the searched name (0.0 - 1.0)
    pub similarity: f64,

    /// Main-story completion time in hours
    pub completion_hours: Option<f64>,

    /// Page of the candidate on the search service
    pub reference_link: String,
}

impl TitleCandidate {
    pub fn new(
        candidate_name: impl Into<String>,
        similarity: f64,
        completion_hours: Option<f64>,
        reference_link: impl Into<String>,
    ) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            similarity,
            completion_hours,
            reference_link: reference_link.into(),
        }
    }
}
