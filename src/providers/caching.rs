use crate::core::cache::Cache;
use crate::core::error::Result;
use crate::core::source::{DataSource, ResultSet, SheetQuery};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache key: the query text scoped to the connection that ran it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: String,
    pub connection_id: u64,
}

/// Serves repeated queries from a cache for `ttl`. Failed queries are not
/// cached.
pub struct CachingDataSource<T: DataSource> {
    inner: T,
    cache: Arc<dyn Cache<QueryKey, ResultSet>>,
    ttl: Duration,
}

impl<T: DataSource> CachingDataSource<T> {
    pub fn new(inner: T, cache: Arc<dyn Cache<QueryKey, ResultSet>>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl<T: DataSource> DataSource for CachingDataSource<T> {
    async fn connection_id(&self) -> Result<u64> {
        self.inner.connection_id().await
    }

    async fn run_query(&self, query: &SheetQuery) -> Result<ResultSet> {
        let key = QueryKey {
            query: query.to_string(),
            connection_id: self.inner.connection_id().await?,
        };
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving sheet from cache, fetched at {}", cached.fetched_at);
            return Ok(cached);
        }

        let result = self.inner.run_query(query).await?;
        self.cache.put(key, result.clone(), Some(self.ttl)).await;
        Ok(result)
    }
}
