use thiserror::Error;

/// Main error type for the library enrichment pipeline
#[derive(Error, Debug)]
pub enum LibraryStatsError {
    /// Remote service unreachable, non-success status or unparseable body
    #[error("Upstream '{service}' unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },

    /// Title search returned no candidates
    #[error("No match found for title: {0}")]
    NoMatchFound(String),

    /// Best candidate carries no completion-time figure
    #[error("No completion data for '{title}' ({link})")]
    NoCompletionData { title: String, link: String },

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV export errors
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl LibraryStatsError {
    pub(crate) fn upstream(service: &str, message: impl Into<String>) -> Self {
        LibraryStatsError::UpstreamUnavailable {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Failures that leave a title in the output with an absent completion time
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            LibraryStatsError::NoMatchFound(_) | LibraryStatsError::NoCompletionData { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LibraryStatsError>;
