//! Memoized product → category resolution for a single transform run.
//!
//! A resolver is created by [`crate::pipeline::TransformPipeline`] and dropped
//! with it. The cache has no TTL and no capacity bound: within a run a
//! product's category never changes, and across runs nothing is shared.

use std::sync::atomic::{AtomicUsize, Ordering};

use cart_summary_core::{Category, ProductId};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::catalog::CategoryLookup;

/// Lookup counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Calls made to the underlying lookup.
    pub lookups: usize,
    /// Lookups that failed and were recorded as unresolved.
    pub failed_lookups: usize,
    /// Resolutions answered from the cache.
    pub cache_hits: usize,
}

/// Resolves product categories, calling the lookup at most once per product.
///
/// Failed lookups are cached as `None` and never retried within the run.
pub struct CategoryResolver<L> {
    lookup: L,
    cache: Cache<ProductId, Option<Category>>,
    lookups: AtomicUsize,
    failed_lookups: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl<L: CategoryLookup> CategoryResolver<L> {
    #[must_use]
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: Cache::builder().build(),
            lookups: AtomicUsize::new(0),
            failed_lookups: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }

    /// Resolve a product's category, or `None` if it cannot be resolved.
    ///
    /// Concurrent calls for the same uncached id share a single lookup.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn resolve(&self, product_id: &ProductId) -> Option<Category> {
        let entry = self
            .cache
            .entry_by_ref(product_id)
            .or_insert_with(self.fetch(product_id))
            .await;

        if !entry.is_fresh() {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for product category");
        }

        entry.into_value()
    }

    async fn fetch(&self, product_id: &ProductId) -> Option<Category> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        match self.lookup.get_category(product_id).await {
            Ok(category) => {
                debug!(category = %category, "Resolved product category");
                Some(category)
            }
            Err(e) => {
                self.failed_lookups.fetch_add(1, Ordering::Relaxed);
                warn!(
                    error = %e,
                    "Category lookup failed, product will not be counted"
                );
                None
            }
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            failed_lookups: self.failed_lookups.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    /// The underlying lookup.
    #[must_use]
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }
}
