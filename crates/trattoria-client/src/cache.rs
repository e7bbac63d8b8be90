//! Product lookup cache using moka
//!
//! Wraps any [`ProductLookup`] and keeps successful answers for a bounded
//! time. Failures are never cached, so a transient outage does not pin a
//! line at zero.

use crate::config::ClientConfig;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use trattoria_cart::{LookupError, Product, ProductId, ProductLookup};

/// Read-through cache in front of a product lookup
#[derive(Debug, Clone)]
pub struct CachedLookup<L> {
    inner: L,
    cache: Cache<ProductId, Product>,
}

impl<L: ProductLookup> CachedLookup<L> {
    /// Create cache with capacity and time-to-live
    #[must_use]
    pub fn new(inner: L, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create cache sized by `lookup_cache_capacity` and
    /// `lookup_cache_ttl_secs`
    #[must_use]
    pub fn from_config(inner: L, config: &ClientConfig) -> Self {
        Self::new(inner, config.lookup_cache_capacity, config.lookup_cache_ttl())
    }

    /// Drop a cached product (e.g. after a price change)
    #[inline]
    pub async fn invalidate(&self, id: ProductId) {
        self.cache.invalidate(&id).await;
    }

    /// Drop everything
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Wrapped lookup
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: ProductLookup> ProductLookup for CachedLookup<L> {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        if let Some(cached) = self.cache.get(&id).await {
            tracing::trace!(%id, "Product cache hit");
            return Ok(cached);
        }
        let product = self.inner.product(id).await?;
        self.cache.insert(id, product.clone()).await;
        Ok(product)
    }
}
