//! Summarize cart records read from a file.

use std::path::Path;

use cart_summary_core::RawCartRecord;
use cart_summary_etl::{
    CatalogClient, CategoryLookup, Destination, EtlConfig, InMemoryCatalog, PipelineOptions,
    TransformPipeline, extract, load,
};
use tracing::info;

use super::pipeline_options;

/// Read records from `input`, summarize them and write the summaries.
///
/// Categories come from `catalog` (a saved `/products` listing) when given,
/// otherwise from the live catalog service.
///
/// # Errors
///
/// Returns an error if reading, validation, or writing fails.
pub async fn run(
    config: &EtlConfig,
    input: &Path,
    catalog: Option<&Path>,
    output: &Destination,
) -> Result<(), Box<dyn std::error::Error>> {
    let carts = extract::read_carts(input).await?;
    let options = pipeline_options(config);

    match catalog {
        Some(path) => {
            let body = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            let catalog = InMemoryCatalog::from_json(&body)?;
            info!(products = catalog.len(), path = %path.display(), "Loaded offline catalog");
            summarize(catalog, carts, options, output).await
        }
        None => summarize(CatalogClient::new(config)?, carts, options, output).await,
    }
}

/// Run the pipeline over `carts` and write the result.
pub(super) async fn summarize<L: CategoryLookup>(
    lookup: L,
    carts: Vec<RawCartRecord>,
    options: PipelineOptions,
    output: &Destination,
) -> Result<(), Box<dyn std::error::Error>> {
    let summaries = TransformPipeline::with_options(lookup, options)
        .run(carts)
        .await?;

    load::write_summaries(&summaries, output).await?;
    Ok(())
}
