//! Transform pipeline: raw cart records in, per-user summaries out.
//!
//! A [`TransformPipeline`] owns one [`CategoryResolver`] and is consumed by
//! [`TransformPipeline::run`], so a finished pipeline (and its category
//! cache) cannot be run again.
//!
//! # Run phases
//!
//! 1. Validate every raw record. The first malformed record aborts the run
//!    before any catalog traffic.
//! 2. Optionally prefetch the categories of all distinct products with
//!    bounded concurrency.
//! 3. Route records, in input order, to per-user aggregators created on
//!    first sight.
//! 4. Finalize aggregators in the order their users first appeared.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use cart_summary_core::{CartRecord, MalformedRecordError, ProductId, RawCartRecord, UserId, UserSummary};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::aggregator::{AggregatorError, UserAggregator};
use crate::catalog::CategoryLookup;
use crate::resolver::{CategoryResolver, ResolverStats};

/// Fatal transform failures. No summaries are produced when one occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}

/// Tuning knobs for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Concurrent category lookups issued before aggregation. `1` disables
    /// prefetching; products are then resolved as records are observed.
    pub prefetch_concurrency: NonZeroUsize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            prefetch_concurrency: NonZeroUsize::MIN,
        }
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub users: usize,
    pub distinct_products: usize,
    pub resolver: ResolverStats,
}

/// Summaries of a completed run, in first-seen user order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub summaries: Vec<UserSummary>,
    pub stats: RunStats,
}

/// Single-use transform over one batch of cart records.
pub struct TransformPipeline<L> {
    resolver: CategoryResolver<L>,
    options: PipelineOptions,
}

impl<L: CategoryLookup> TransformPipeline<L> {
    /// Create a pipeline with a fresh resolver over `lookup`.
    #[must_use]
    pub fn new(lookup: L) -> Self {
        Self::with_options(lookup, PipelineOptions::default())
    }

    #[must_use]
    pub fn with_options(lookup: L, options: PipelineOptions) -> Self {
        Self {
            resolver: CategoryResolver::new(lookup),
            options,
        }
    }

    /// Run the transform and return the summaries.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedRecord`] for the first record that
    /// fails validation.
    pub async fn run<I>(self, records: I) -> Result<Vec<UserSummary>, PipelineError>
    where
        I: IntoIterator<Item = RawCartRecord>,
    {
        self.run_with_stats(records).await.map(|output| output.summaries)
    }

    /// Run the transform and return the summaries with run totals.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedRecord`] for the first record that
    /// fails validation.
    #[instrument(skip_all, fields(prefetch = self.options.prefetch_concurrency.get()))]
    pub async fn run_with_stats<I>(self, records: I) -> Result<TransformOutput, PipelineError>
    where
        I: IntoIterator<Item = RawCartRecord>,
    {
        let carts = records
            .into_iter()
            .enumerate()
            .map(|(position, raw)| CartRecord::validate(raw, position))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(records = carts.len(), "Validated cart records");

        let distinct = distinct_products(&carts);
        if self.options.prefetch_concurrency.get() > 1 {
            self.prefetch(&distinct).await;
        }

        let mut order: Vec<UserId> = Vec::new();
        let mut aggregators: HashMap<UserId, UserAggregator> = HashMap::new();

        for cart in &carts {
            let aggregator = match aggregators.entry(cart.user_id().clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    order.push(cart.user_id().clone());
                    entry.insert(UserAggregator::new(cart.user_id().clone(), cart.timestamp()))
                }
            };
            aggregator.observe(cart, &self.resolver).await?;
        }

        let summaries = order
            .into_iter()
            .filter_map(|user_id| aggregators.remove(&user_id))
            .map(|mut aggregator| aggregator.finalize())
            .collect::<Result<Vec<_>, _>>()?;

        let stats = RunStats {
            records: carts.len(),
            users: summaries.len(),
            distinct_products: distinct.len(),
            resolver: self.resolver.stats(),
        };

        info!(
            records = stats.records,
            users = stats.users,
            distinct_products = stats.distinct_products,
            lookups = stats.resolver.lookups,
            failed_lookups = stats.resolver.failed_lookups,
            cache_hits = stats.resolver.cache_hits,
            "Transform complete"
        );

        Ok(TransformOutput { summaries, stats })
    }

    async fn prefetch(&self, products: &[ProductId]) {
        let concurrency = self.options.prefetch_concurrency.get();
        debug!(products = products.len(), concurrency, "Prefetching categories");

        let resolver = &self.resolver;
        stream::iter(products)
            .for_each_concurrent(concurrency, |product_id| async move {
                resolver.resolve(product_id).await;
            })
            .await;
    }
}

/// Distinct product ids in first-seen order.
fn distinct_products(carts: &[CartRecord]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    carts
        .iter()
        .flat_map(CartRecord::products)
        .filter(|product| seen.insert(&product.product_id))
        .map(|product| product.product_id.clone())
        .collect()
}
