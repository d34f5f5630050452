use anyhow::Result;
use futures::future::join_all;
use tracing::debug;

use crate::cache::FeedCache;
use crate::config::FeedConfig;
use crate::db::Database;
use crate::extractor::MediaItem;
use crate::normalize::normalize_collections;
use crate::transport::{resolve_collection, FetchOutcome};
use crate::{FeedRequest, FeedResponse};

/// Aggregator owns the HTTP client, the two-tier cache, and the config,
/// and provides the one feed-loading operation presentation code calls.
pub struct FeedAggregator {
    client: reqwest::Client,
    cache: FeedCache,
    config: FeedConfig,
}

impl FeedAggregator {
    /// Connect the durable tier (running migrations) and build the shared
    /// HTTP client.
    pub async fn connect(config: FeedConfig) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await?;
        db.run_migrations().await?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        let cache = FeedCache::new(db, config.ttl_secs);
        Ok(Self { client, cache, config })
    }

    /// Assemble from pre-built parts; lets embedders share a client or a
    /// database handle.
    pub fn with_parts(client: reqwest::Client, cache: FeedCache, config: FeedConfig) -> Self {
        Self { client, cache, config }
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Normalize a free-text query and load the feed for it.
    pub async fn load(&self, query: &str, data_saver: bool) -> FeedResponse {
        let request = FeedRequest {
            identifiers: normalize_collections(query),
            data_saver,
        };
        self.load_feed(&request).await
    }

    /// Resolve every requested collection concurrently, then merge, rank,
    /// and summarize. No single source's failure aborts the others, and
    /// the join settles only when every branch has a terminal outcome.
    pub async fn load_feed(&self, request: &FeedRequest) -> FeedResponse {
        let outcomes = join_all(request.identifiers.iter().map(|collection| {
            resolve_collection(
                &self.client,
                &self.cache,
                &self.config,
                collection,
                request.data_saver,
            )
        }))
        .await;

        let mut items: Vec<MediaItem> = Vec::new();
        let mut provenances: Vec<String> = Vec::new();
        let mut failures: Vec<String> = Vec::new();
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Success { items: batch, provenance } => {
                    if !provenances.contains(&provenance) {
                        provenances.push(provenance);
                    }
                    items.extend(batch);
                }
                FetchOutcome::Failure { diagnostic } => failures.push(diagnostic),
            }
        }

        rank(&mut items);
        debug!(
            items = items.len(),
            failures = failures.len(),
            "feed load settled"
        );

        let provenance_summary = if provenances.is_empty() {
            String::new()
        } else {
            format!("Loaded via: {} | {} media items", provenances.join(", "), items.len())
        };

        let diagnostic = if items.is_empty() && !failures.is_empty() {
            Some(format!("Could not load media. {}", failures[0]))
        } else if items.is_empty() {
            Some("No media found in selected collections.".to_string())
        } else if !failures.is_empty() {
            Some(format!(
                "Loaded partial results. {} collection request(s) failed.",
                failures.len()
            ))
        } else {
            None
        };

        FeedResponse { items, provenance_summary, diagnostic }
    }
}

/// Rank the merged feed: stable sort by score descending, so entries with
/// equal score keep their source-merge order (sources merge in request
/// order before the sort).
fn rank(items: &mut [MediaItem]) {
    items.sort_by(|a, b| b.ups.cmp(&a.ups));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::MediaKind;

    fn item(id: &str, collection: &str, ups: i64) -> MediaItem {
        MediaItem {
            id: id.into(),
            title: "t".into(),
            collection: collection.into(),
            permalink: format!("https://reddit.com/r/{collection}/{id}"),
            kind: MediaKind::Image,
            url: "https://i.example.com/x.jpg".into(),
            thumb: None,
            author: "u".into(),
            ups,
        }
    }

    #[test]
    fn rank_sorts_by_score_descending() {
        let mut items = vec![item("a", "pics", 2), item("b", "pics", 10), item("c", "pics", 5)];
        rank(&mut items);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn rank_keeps_merge_order_for_equal_scores() {
        // Source A's items precede source B's in the merged vec; ties must
        // preserve that order.
        let mut items = vec![
            item("a1", "pics", 5),
            item("a2", "pics", 3),
            item("b1", "videos", 5),
            item("b2", "videos", 3),
        ];
        rank(&mut items);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a1", "b1", "a2", "b2"]);
    }
}
