pub mod steam;

use async_trait::async_trait;
use crate::core::{CatalogInfo, LibraryEntry, ReviewSummary};
use crate::error::Result;

pub use steam::SteamProvider;

/// Trait for the platform that owns the library and its storefront
#[async_trait]
pub trait GameStore: Send + Sync {
    /// List every title owned by `user_id`, including never-played ones
    async fn owned_games(&self, user_id: &str) -> Result<Vec<LibraryEntry>>;

    /// Storefront metadata for one title
    async fn catalog_info(&self, app_id: u64) -> Result<CatalogInfo>;

    /// Aggregate review counts for one title
    async fn review_summary(&self, app_id: u64) -> Result<ReviewSummary>;

    /// Get provider name
    fn name(&self) -> &str;
}
