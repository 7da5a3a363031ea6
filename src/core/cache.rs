use async_trait::async_trait;
use std::time::Duration;

/// An expiring key/value table. Entries put with a TTL stop being returned
/// once it elapses.
#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);
}
