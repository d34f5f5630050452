pub mod aggregator;
pub mod cache;
pub mod config;
pub mod db;
pub mod extractor;
pub mod listing;
pub mod normalize;
pub mod storage;
pub mod suggest;
pub mod transport;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::aggregator::FeedAggregator;
    pub use crate::cache::{CacheEntry, CacheTier, FeedCache, FeedKey};
    pub use crate::config::FeedConfig;
    pub use crate::extractor::{MediaItem, MediaKind};
    pub use crate::transport::FetchOutcome;
    pub use crate::{FeedRequest, FeedResponse};
}

use serde::{Deserialize, Serialize};

pub use aggregator::FeedAggregator;
pub use config::FeedConfig;
pub use extractor::{MediaItem, MediaKind};

/// What presentation code asks for: which collections, and whether to
/// prefer reduced-bandwidth media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRequest {
    pub identifiers: Vec<String>,
    pub data_saver: bool,
}

/// The settled result of a feed load. Partial success carries items plus a
/// secondary diagnostic rather than failing the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub items: Vec<MediaItem>,
    /// Distinct tiers/transports that answered, plus the item count; empty
    /// when no source succeeded.
    pub provenance_summary: String,
    /// Aggregate-level error or info text, if any.
    pub diagnostic: Option<String>,
}
