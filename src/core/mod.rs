pub mod enriched_record;
pub mod library_entry;

pub use enriched_record::{completion_ratio, CompletionEstimate, EnrichedRecord};
pub use library_entry::{CatalogInfo, LibraryEntry, ReviewSummary};
