/// Estimated minutes needed to finish a title
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionEstimate {
    pub minutes: Option<f64>,
}

impl CompletionEstimate {
    pub fn known(minutes: f64) -> Self {
        Self {
            minutes: Some(minutes),
        }
    }

    pub fn unknown() -> Self {
        Self { minutes: None }
    }
}

/// One fully enriched library title
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub id: u64,
    pub name: String,
    pub genres: Vec<String>,

    /// Positive / total reviews (0.0 - 1.0)
    pub review_ratio: Option<f64>,

    pub completion_time_minutes: Option<f64>,
    pub play_time_minutes: u64,

    /// Play time / completion time
    pub completion_ratio: Option<f64>,
}

impl EnrichedRecord {
    /// Check whether every optional field was resolved
    pub fn is_complete(&self) -> bool {
        self.review_ratio.is_some()
            && self.completion_time_minutes.is_some()
            && self.completion_ratio.is_some()
    }
}

/// Play time over completion time; absent unless the completion time is a positive number
pub fn completion_ratio(play_time_minutes: u64, completion_time_minutes: Option<f64>) -> Option<f64> {
    completion_time_minutes
        .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
        .map(|minutes| play_time_minutes as f64 / minutes)
}
