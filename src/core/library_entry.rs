/// One owned title as reported by the platform
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    /// Steam app id
    pub id: u64,

    /// Title name
    pub name: String,

    /// Cumulative play time in minutes
    pub play_time_minutes: u64,
}

impl LibraryEntry {
    pub fn new(id: u64, name: impl Into<String>, play_time_minutes: u64) -> Self {
        Self {
            id,
            name: name.into(),
            play_time_minutes,
        }
    }

    /// Get display name (for logging)
    pub fn display_name(&self) -> String {
        format!("{} [{}]", self.name, self.id)
    }
}

/// Storefront metadata for a single title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogInfo {
    pub id: u64,
    pub name: String,

    /// Genre descriptions in store order
    pub genres: Vec<String>,
}

/// Aggregate review counts for a single title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub total_positive: u64,
    pub total_negative: u64,
}

impl ReviewSummary {
    pub fn new(total_positive: u64, total_negative: u64) -> Self {
        Self {
            total_positive,
            total_negative,
        }
    }

    pub fn total(&self) -> u64 {
        self.total_positive + self.total_negative
    }

    /// Positive share of all reviews, `None` while the title has no reviews
    pub fn ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.total_positive as f64 / total as f64),
        }
    }
}
