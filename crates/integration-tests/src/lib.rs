//! Integration tests for the cart summary ETL.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-summary-integration-tests
//! ```
//!
//! Everything runs against [`InMemoryCatalog`], so no network is needed.
//! This crate only provides fixtures; the tests live under `tests/`.

use cart_summary_core::{Category, ProductId, RawCartRecord, UserId};
use cart_summary_etl::InMemoryCatalog;

/// Build a raw cart record for `user_id` at `date` holding `products`.
#[must_use]
pub fn cart(user_id: UserId, date: &str, products: &[i64]) -> RawCartRecord {
    let products: Vec<ProductId> = products.iter().copied().map(ProductId::int).collect();
    RawCartRecord::new(&user_id, date, &products)
}

/// Catalog with products `1` and `2` in "electronics" and `3` in "jewelery".
///
/// Any other id is not found.
#[must_use]
pub fn fixture_catalog() -> InMemoryCatalog {
    let electronics = category("electronics");
    InMemoryCatalog::new()
        .with_category(ProductId::int(1), electronics.clone())
        .with_category(ProductId::int(2), electronics)
        .with_category(ProductId::int(3), category("jewelery"))
}

/// Parse a category name known to be valid.
///
/// # Panics
///
/// Panics if `name` is blank.
#[must_use]
pub fn category(name: &str) -> Category {
    Category::parse(name).expect("fixture category names are non-empty")
}
