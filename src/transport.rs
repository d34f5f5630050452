//! Per-source fetch: cache consult, timeout-bounded network access with a
//! fixed chain of alternate endpoints, extraction, and write-through.
//!
//! Failures here are values. Only network, timeout, and non-success status
//! conditions fail a source; a body whose listing structure is malformed or
//! absent still resolves to a (possibly empty) successful snapshot.

use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{unix_now, CacheEntry, FeedCache, FeedKey};
use crate::config::FeedConfig;
use crate::extractor::{extract_media, MediaItem};
use crate::listing::{Listing, RawListingEntry};

/// Result of resolving one collection. The aggregator never raises on a
/// per-source failure; it collects these.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success {
        items: Vec<MediaItem>,
        /// Which tier or transport satisfied the request.
        provenance: String,
    },
    Failure {
        diagnostic: String,
    },
}

/// Resolve one collection to a fetch outcome.
///
/// Order: live cache hit (no network), then the canonical endpoint, then
/// the alternates in fixed priority order, stopping at the first success.
/// Every success refreshes both cache tiers.
pub async fn resolve_collection(
    client: &Client,
    cache: &FeedCache,
    config: &FeedConfig,
    collection: &str,
    data_saver: bool,
) -> FetchOutcome {
    let key = FeedKey::new(collection, data_saver);
    let now = unix_now();

    if let Some((entry, tier)) = cache.read(&key, now).await {
        debug!(collection, tier = tier.provenance(), "cache hit");
        return FetchOutcome::Success {
            items: entry.items,
            provenance: tier.provenance().to_string(),
        };
    }

    let target = listing_url(config, collection);
    let attempts = [
        ("reddit", target.clone(), false),
        ("mirror", mirror_url(config, &target), false),
        ("textproxy", text_proxy_url(config, &target), true),
    ];

    let mut last_diagnostic = format!("r/{collection}: no endpoints configured");
    for (label, url, embedded_json) in attempts {
        match fetch_body(client, &url, config.timeout).await {
            Ok(body) => {
                let body = if embedded_json { skip_to_json(&body) } else { &body };
                let entries = parse_entries(body);
                let items: Vec<MediaItem> = entries
                    .iter()
                    .flat_map(|entry| extract_media(entry, data_saver))
                    .collect();
                debug!(collection, endpoint = label, count = items.len(), "resolved listing");
                cache
                    .write(&key, CacheEntry { captured_at: now, items: items.clone() })
                    .await;
                return FetchOutcome::Success { items, provenance: label.to_string() };
            }
            Err(diagnostic) => {
                warn!(collection, endpoint = label, %diagnostic, "listing fetch failed");
                last_diagnostic = format!("r/{collection}: {diagnostic}");
            }
        }
    }

    FetchOutcome::Failure { diagnostic: last_diagnostic }
}

fn listing_url(config: &FeedConfig, collection: &str) -> String {
    format!(
        "{}/r/{}/hot.json?raw_json=1&limit={}",
        config.listing_base, collection, config.fetch_limit
    )
}

/// Pass-through proxy URL: the target travels percent-encoded in a query
/// parameter.
fn mirror_url(config: &FeedConfig, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}?url={}", config.mirror_base, encoded)
}

fn text_proxy_url(config: &FeedConfig, target: &str) -> String {
    format!("{}/{}", config.text_proxy_base, target)
}

/// GET with a per-call budget. Timing out drops the in-flight request,
/// which releases the underlying connection.
async fn fetch_body(client: &Client, url: &str, timeout: Duration) -> Result<String, String> {
    let request = async {
        let response = client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        response.text().await.map_err(|e| e.to_string())
    };
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result,
        Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
    }
}

/// The text-extraction proxy wraps the document in a non-JSON preamble;
/// the payload starts at the first `{`.
fn skip_to_json(body: &str) -> &str {
    body.find('{').map(|idx| &body[idx..]).unwrap_or("")
}

/// Decode a listing body. Malformed or absent structure is zero entries,
/// not a failure.
fn parse_entries(body: &str) -> Vec<RawListingEntry> {
    serde_json::from_str::<Listing>(body)
        .map(Listing::into_entries)
        .unwrap_or_default()
}
