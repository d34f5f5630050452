use anyhow::Result;
use async_trait::async_trait;

/// Durable tier behind the in-process cache.
///
/// Rows pair a serialized snapshot with its capture time; liveness against
/// the shared TTL is decided by the cache layer at read time.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_cache(&self, key: &str) -> Result<Option<(String, i64)>>;
    async fn put_cache(&self, key: &str, payload: &str, captured_at: i64) -> Result<()>;
}
