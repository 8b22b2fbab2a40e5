//! Caching layer for route lookups.
//!
//! Reopening the same landmark from roughly the same spot should not cost
//! another directions request. Coordinates are snapped to a grid (4 decimal
//! places, about 11 m) so small GPS jitter still hits the cache, and entries
//! expire after a short TTL so routes never go stale for long. Nothing is
//! persisted; failures are never cached.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::directions::{RouteError, RouteFetcher, RouteMetrics};
use crate::domain::LatLng;

/// Cache key: snapped (origin lat, origin lng, destination lat, destination lng).
type RouteKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Decimal places coordinates are rounded to before keying.
    pub coordinate_decimals: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
            coordinate_decimals: 4,
        }
    }
}

/// Route fetcher with caching.
///
/// Wraps any [`RouteFetcher`] and caches successful lookups.
pub struct CachedRouteFetcher<F> {
    inner: F,
    routes: MokaCache<RouteKey, RouteMetrics>,
    scale: f64,
}

impl<F: RouteFetcher> CachedRouteFetcher<F> {
    /// Create a new cached fetcher.
    pub fn new(inner: F, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            routes,
            scale: 10f64.powi(config.coordinate_decimals as i32),
        }
    }

    /// Compute the cache key for a pair of points.
    fn key(&self, origin: LatLng, destination: LatLng) -> RouteKey {
        let snap = |deg: f64| (deg * self.scale).round() as i64;
        (
            snap(origin.lat()),
            snap(origin.lng()),
            snap(destination.lat()),
            snap(destination.lng()),
        )
    }

    /// Access the wrapped fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: RouteFetcher> RouteFetcher for CachedRouteFetcher<F> {
    fn fetch_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<RouteMetrics, RouteError>> {
        async move {
            let key = self.key(origin, destination);

            // Try cache first
            if let Some(cached) = self.routes.get(&key).await {
                debug!(%origin, %destination, "route cache hit");
                return Ok(cached);
            }

            let route = self.inner.fetch_route(origin, destination).await?;
            self.routes.insert(key, route).await;

            Ok(route)
        }
        .boxed()
    }
}
