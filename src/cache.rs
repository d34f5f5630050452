//! Two-tier snapshot cache for extracted feed items.
//!
//! The fast tier is a process-lifetime concurrent map; the slow tier is the
//! durable [`Database`]. Both tiers share one TTL and expiry is decided at
//! read time. A fast-tier miss re-reads the slow tier and promotes the row;
//! writes land in both tiers unconditionally. Entries are immutable
//! snapshots, so a concurrent double-fetch for the same key is harmless
//! (last writer wins).

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::Database;
use crate::extractor::MediaItem;
use crate::storage::Storage;

/// Namespace prefix for durable rows, so the store's entries stay
/// distinguishable from anything else persisted alongside them.
const KEY_PREFIX: &str = "subswipe";

/// Cache key: collection name plus fetch mode. Snapshots captured in
/// data-saver mode resolve different URLs, so the modes never collide.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FeedKey {
    pub collection: String,
    pub data_saver: bool,
}

impl FeedKey {
    pub fn new(collection: &str, data_saver: bool) -> Self {
        Self { collection: collection.to_string(), data_saver }
    }

    pub fn mode(&self) -> &'static str {
        if self.data_saver { "saver" } else { "full" }
    }

    /// Key of the durable row backing this entry.
    pub fn storage_key(&self) -> String {
        format!("{}|{}|{}", KEY_PREFIX, self.collection, self.mode())
    }
}

/// A timestamped snapshot of extracted items. Valid only while
/// `now - captured_at < ttl`; expired entries are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub captured_at: i64,
    pub items: Vec<MediaItem>,
}

impl CacheEntry {
    pub fn is_live(&self, now: i64, ttl_secs: i64) -> bool {
        now - self.captured_at < ttl_secs
    }
}

/// Which tier satisfied a read; feeds the provenance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Memory,
    Disk,
}

impl CacheTier {
    pub fn provenance(self) -> &'static str {
        match self {
            CacheTier::Memory => "cache(mem)",
            CacheTier::Disk => "cache(disk)",
        }
    }
}

pub struct FeedCache {
    fast: DashMap<FeedKey, CacheEntry>,
    slow: Database,
    ttl_secs: i64,
}

impl FeedCache {
    pub fn new(slow: Database, ttl_secs: i64) -> Self {
        Self { fast: DashMap::new(), slow, ttl_secs }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Read a live entry for `key` as of `now`, reporting which tier
    /// answered. Expired rows and unparseable durable payloads read as
    /// absent; slow-tier read errors fail open to a miss.
    pub async fn read(&self, key: &FeedKey, now: i64) -> Option<(CacheEntry, CacheTier)> {
        if let Some(entry) = self.fast.get(key) {
            if entry.is_live(now, self.ttl_secs) {
                return Some((entry.clone(), CacheTier::Memory));
            }
        }

        let row = match self.slow.get_cache(&key.storage_key()).await {
            Ok(row) => row,
            Err(e) => {
                warn!(key = %key.storage_key(), error = %e, "durable cache read failed");
                return None;
            }
        };
        let (payload, captured_at) = row?;
        if now - captured_at >= self.ttl_secs {
            return None;
        }
        let items: Vec<MediaItem> = match serde_json::from_str(&payload) {
            Ok(items) => items,
            Err(e) => {
                debug!(key = %key.storage_key(), error = %e, "discarding corrupt cache payload");
                return None;
            }
        };
        let entry = CacheEntry { captured_at, items };
        self.fast.insert(key.clone(), entry.clone());
        Some((entry, CacheTier::Disk))
    }

    /// Write a fresh snapshot into both tiers, overwriting any prior entry
    /// for the key. A durable write failure is logged and swallowed; the
    /// fast tier still serves the snapshot for this process.
    pub async fn write(&self, key: &FeedKey, entry: CacheEntry) {
        match serde_json::to_string(&entry.items) {
            Ok(payload) => {
                if let Err(e) = self
                    .slow
                    .put_cache(&key.storage_key(), &payload, entry.captured_at)
                    .await
                {
                    warn!(key = %key.storage_key(), error = %e, "durable cache write failed");
                }
            }
            Err(e) => warn!(key = %key.storage_key(), error = %e, "cache payload serialization failed"),
        }
        self.fast.insert(key.clone(), entry);
    }

    /// Drop cached snapshots from both tiers, optionally only for
    /// collections starting with `prefix`. Returns durable rows removed.
    pub async fn clear(&self, prefix: Option<&str>) -> anyhow::Result<u64> {
        let removed = match prefix {
            Some(p) => {
                let storage_prefix = format!("{}|{}", KEY_PREFIX, p);
                self.fast.retain(|k, _| !k.collection.starts_with(p));
                self.slow.clear_cache_prefix(Some(&storage_prefix)).await?
            }
            None => {
                self.fast.clear();
                self.slow.clear_cache_prefix(None).await?
            }
        };
        Ok(removed)
    }

    /// (total, expired) durable snapshot counts as of now.
    pub async fn stats(&self) -> anyhow::Result<(u64, u64)> {
        self.slow.cache_stats(unix_now() - self.ttl_secs).await
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
