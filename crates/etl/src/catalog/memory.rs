//! In-memory category source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use cart_summary_core::{Category, ProductId};

use super::{CatalogError, CatalogProduct, CategoryLookup};

/// Categories held in memory, keyed by product id.
///
/// Built from a saved `/products` listing for offline transforms, or by hand
/// in tests. Every lookup is counted so callers can check how often each id
/// was requested.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    categories: HashMap<ProductId, Category>,
    missing_category: Vec<ProductId>,
    calls: Mutex<HashMap<ProductId, usize>>,
    total_calls: AtomicUsize,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a product listing. Products without a category are kept so
    /// lookups report [`CatalogError::MissingCategory`] rather than not-found.
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            let id = product.id.clone();
            match product.into_category() {
                Ok(category) => {
                    catalog.categories.insert(id, category);
                }
                Err(_) => catalog.missing_category.push(id),
            }
        }
        catalog
    }

    /// Decode a `/products` JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the body is not a product array.
    pub fn from_json(body: &str) -> Result<Self, CatalogError> {
        let products: Vec<CatalogProduct> = serde_json::from_str(body)?;
        Ok(Self::from_products(products))
    }

    /// Add or replace one product's category.
    #[must_use]
    pub fn with_category(mut self, product_id: ProductId, category: Category) -> Self {
        self.categories.insert(product_id, category);
        self
    }

    /// Number of products with a known category.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// How many times `product_id` has been looked up.
    #[must_use]
    pub fn lookup_count(&self, product_id: &ProductId) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(product_id)
            .copied()
            .unwrap_or(0)
    }

    /// Total lookups across all ids.
    #[must_use]
    pub fn total_lookups(&self) -> usize {
        self.total_calls.load(Ordering::Relaxed)
    }

    fn lookup(&self, product_id: &ProductId) -> Result<Category, CatalogError> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(product_id.clone())
            .or_insert(0) += 1;

        if let Some(category) = self.categories.get(product_id) {
            return Ok(category.clone());
        }
        if self.missing_category.contains(product_id) {
            return Err(CatalogError::MissingCategory(product_id.clone()));
        }
        Err(CatalogError::NotFound(product_id.clone()))
    }
}

impl CategoryLookup for InMemoryCatalog {
    async fn get_category(&self, product_id: &ProductId) -> Result<Category, CatalogError> {
        self.lookup(product_id)
    }
}
