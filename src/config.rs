//! Aggregator configuration. Constructed explicitly and passed down so no
//! component keeps hidden process-wide state; endpoint bases live here so
//! tests can point the resolver at a local server.

use std::time::Duration;

pub const DEFAULT_LISTING_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_MIRROR_BASE: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_TEXT_PROXY_BASE: &str = "https://r.jina.ai";

pub const DEFAULT_FETCH_LIMIT: u32 = 30;
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Canonical listing endpoint base.
    pub listing_base: String,
    /// Pass-through proxy taking the target URL as a query parameter.
    pub mirror_base: String,
    /// Text-extraction proxy; its body embeds the JSON after a preamble.
    pub text_proxy_base: String,
    /// Entries requested per collection.
    pub fetch_limit: u32,
    /// Per-request budget; an in-flight request past this is cancelled.
    pub timeout: Duration,
    /// Shared TTL for both cache tiers.
    pub ttl_secs: i64,
    pub user_agent: String,
    /// Durable tier URL; None picks the default SQLite file.
    pub database_url: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            listing_base: DEFAULT_LISTING_BASE.to_string(),
            mirror_base: DEFAULT_MIRROR_BASE.to_string(),
            text_proxy_base: DEFAULT_TEXT_PROXY_BASE.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ttl_secs: DEFAULT_TTL_SECS,
            user_agent: format!("subswipe/{}", env!("CARGO_PKG_VERSION")),
            database_url: None,
        }
    }
}

impl FeedConfig {
    /// Defaults with env overrides, same shape the rest of the tooling
    /// uses: unset or unparseable values fall back silently.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ttl) = env_parse::<i64>("SUBSWIPE_TTL_SECS") {
            config.ttl_secs = ttl;
        }
        if let Some(secs) = env_parse::<u64>("SUBSWIPE_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = env_parse::<u32>("SUBSWIPE_FETCH_LIMIT") {
            config.fetch_limit = limit;
        }
        if let Ok(url) = std::env::var("SUBSWIPE_DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database_url = Some(url);
            }
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
