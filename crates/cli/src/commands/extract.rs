//! Fetch raw cart records and write them unchanged.

use cart_summary_etl::{CatalogClient, Destination, EtlConfig, extract, load};

/// Fetch `/carts` from the catalog service and write the records to `output`.
///
/// # Errors
///
/// Returns an error if the catalog request or the write fails.
pub async fn run(config: &EtlConfig, output: &Destination) -> Result<(), Box<dyn std::error::Error>> {
    let client = CatalogClient::new(config)?;
    let carts = extract::fetch_carts(&client).await?;

    load::write_json(&carts, output).await?;
    tracing::info!(count = carts.len(), destination = %output, "Cart records written");

    Ok(())
}
