//! # Steam Library Stats
//!
//! One-shot batch enrichment of a Steam library:
//! - Owned titles and play time from the Steam Web API
//! - Genres and review counts from the Steam storefront
//! - Completion-time estimates from HowLongToBeat, fuzzy matched by title
//! - CSV export of one enriched record per title
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use steam_library_stats::{HowLongToBeatSearch, LibraryEngine, Settings, SteamProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load("apikey.json")?;
//!     let engine = LibraryEngine::new(
//!         Arc::new(SteamProvider::from_settings(&settings)?),
//!         Arc::new(HowLongToBeatSearch::from_settings(&settings)?),
//!     );
//!
//!     let report = engine.run(&settings.user_id, &settings.output_path).await?;
//!     println!("Exported {} titles", report.records().count());
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod export;
pub mod providers;

// Re-export primary types
pub use completion::{CompletionEstimator, HowLongToBeatSearch, TitleCandidate, TitleSearch};
pub use config::Settings;
pub use crate::core::{CatalogInfo, CompletionEstimate, EnrichedRecord, LibraryEntry, ReviewSummary};
pub use engine::{BatchReport, LibraryEngine, TitleOutcome};
pub use error::{LibraryStatsError, Result};
pub use providers::{GameStore, SteamProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
