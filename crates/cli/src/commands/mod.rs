//! Subcommand implementations.

pub mod etl;
pub mod extract;
pub mod transform;

use cart_summary_etl::{EtlConfig, PipelineOptions};

/// Pipeline options derived from configuration and command-line overrides.
const fn pipeline_options(config: &EtlConfig) -> PipelineOptions {
    PipelineOptions {
        prefetch_concurrency: config.prefetch_concurrency,
    }
}
