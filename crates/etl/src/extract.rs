//! Extract step: obtain raw cart records.
//!
//! Records come either straight from the catalog service's `/carts` endpoint
//! or from a JSON file written by an earlier `extract` invocation. Either way
//! they are returned unvalidated; validation belongs to the transform.

use std::path::{Path, PathBuf};

use cart_summary_core::RawCartRecord;
use thiserror::Error;
use tracing::info;

use crate::catalog::{CatalogClient, CatalogError};

/// Errors that can occur while extracting cart records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Fetching from the catalog service failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading the input file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input file is not a JSON array of cart records.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Fetch all cart records from the catalog service.
///
/// # Errors
///
/// Returns [`ExtractError::Catalog`] if the request fails.
pub async fn fetch_carts(client: &CatalogClient) -> Result<Vec<RawCartRecord>, ExtractError> {
    let carts = client.fetch_carts().await?;
    info!(count = carts.len(), source = %client.base_url(), "Extracted cart records");
    Ok(carts)
}

/// Read cart records from a JSON file.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read, or
/// [`ExtractError::Decode`] if it is not a JSON array of cart records.
pub async fn read_carts(path: &Path) -> Result<Vec<RawCartRecord>, ExtractError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let carts: Vec<RawCartRecord> =
        serde_json::from_str(&content).map_err(|source| ExtractError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    info!(count = carts.len(), path = %path.display(), "Read cart records");
    Ok(carts)
}
