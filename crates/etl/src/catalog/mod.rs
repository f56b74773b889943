//! Product catalog access.
//!
//! # Architecture
//!
//! - [`CategoryLookup`] is the seam between the transform and wherever
//!   categories come from
//! - [`CatalogClient`] talks to the catalog HTTP service (`/products/{id}`,
//!   `/carts`) with `reqwest`
//! - [`InMemoryCatalog`] serves categories from a product list already in
//!   memory, e.g. a saved `/products` response
//!
//! Lookups are never cached here. Memoization is per run and lives in
//! [`crate::resolver::CategoryResolver`].

mod client;
mod memory;

use std::future::Future;
use std::sync::Arc;

use cart_summary_core::{Category, ProductId};
use serde::Deserialize;
use thiserror::Error;

pub use client::CatalogClient;
pub use memory::InMemoryCatalog;

/// Errors that can occur when looking up catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The catalog has no product with this id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The product exists but carries no usable category.
    #[error("Product {0} has no category")]
    MissingCategory(ProductId),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Source of product categories.
pub trait CategoryLookup: Send + Sync {
    /// Look up the category of a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on any failure; callers decide whether that
    /// is fatal.
    fn get_category(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Category, CatalogError>> + Send;
}

impl<T: CategoryLookup> CategoryLookup for &T {
    fn get_category(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Category, CatalogError>> + Send {
        (**self).get_category(product_id)
    }
}

impl<T: CategoryLookup> CategoryLookup for Arc<T> {
    fn get_category(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Category, CatalogError>> + Send {
        (**self).get_category(product_id)
    }
}

/// Product resource from the catalog API.
///
/// Only the fields the transform needs are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub category: Option<String>,
}

impl CatalogProduct {
    /// Extract a usable category from this product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingCategory`] if the category is absent or blank.
    pub fn into_category(self) -> Result<Category, CatalogError> {
        self.category
            .and_then(|name| Category::try_from(name).ok())
            .ok_or(CatalogError::MissingCategory(self.id))
    }
}

/// Decode a `/products/{id}` response body.
///
/// The service answers unknown ids with `200` and an empty or `null` body, so
/// both are reported as [`CatalogError::NotFound`].
pub(crate) fn parse_product_category(
    product_id: &ProductId,
    body: &str,
) -> Result<Category, CatalogError> {
    if body.trim().is_empty() {
        return Err(CatalogError::NotFound(product_id.clone()));
    }

    let product: Option<CatalogProduct> = serde_json::from_str(body)?;
    product
        .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?
        .into_category()
}
