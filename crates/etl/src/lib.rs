//! Cart Summary ETL - per-user cart summaries from catalog cart data.
//!
//! # Architecture
//!
//! ```text
//! extract ──► TransformPipeline ──► CategoryResolver ──► CategoryLookup
//!                    │                   (per run)        (HTTP / memory)
//!                    ▼
//!             UserAggregator (per user) ──► UserSummary ──► load
//! ```
//!
//! # Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`catalog`] - Catalog HTTP client and the [`catalog::CategoryLookup`] seam
//! - [`resolver`] - Per-run memoized category resolution
//! - [`aggregator`] - Per-user incremental state and tie-break
//! - [`pipeline`] - Validation, routing and first-seen ordering
//! - [`extract`] / [`load`] - Getting records in and summaries out

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod resolver;

pub use aggregator::{AggregatorError, UserAggregator, UserState};
pub use catalog::{CatalogClient, CatalogError, CategoryLookup, InMemoryCatalog};
pub use config::{ConfigError, EtlConfig};
pub use load::Destination;
pub use pipeline::{PipelineError, PipelineOptions, RunStats, TransformOutput, TransformPipeline};
pub use resolver::{CategoryResolver, ResolverStats};
