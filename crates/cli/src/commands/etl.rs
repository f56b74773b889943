//! Extract, transform and load in one invocation.

use cart_summary_etl::{CatalogClient, Destination, EtlConfig, extract};

use super::{pipeline_options, transform::summarize};

/// Fetch carts, summarize them against the same catalog, and write the result.
///
/// # Errors
///
/// Returns an error if any step fails. Nothing is written on failure.
pub async fn run(config: &EtlConfig, output: &Destination) -> Result<(), Box<dyn std::error::Error>> {
    let client = CatalogClient::new(config)?;
    let carts = extract::fetch_carts(&client).await?;

    summarize(client, carts, pipeline_options(config), output).await
}
