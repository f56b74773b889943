//! Catalog HTTP API client.
//!
//! Provides access to the product catalog service for category lookups and
//! the raw `/carts` listing used by the extract step.

use std::sync::Arc;

use cart_summary_core::{Category, ProductId, RawCartRecord};
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogError, CategoryLookup, parse_product_category};
use crate::config::EtlConfig;

/// Catalog HTTP API client.
///
/// Cheap to clone; clones share one connection pool. Sharing the pool across
/// runs is fine because the client itself never caches responses.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base URL cannot
    /// carry a path.
    pub fn new(config: &EtlConfig) -> Result<Self, CatalogError> {
        if config.api_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(config.api_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch every cart record the service exposes.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the service answers with a
    /// non-success status, or the body is not a JSON array of carts.
    #[instrument(skip(self))]
    pub async fn fetch_carts(&self) -> Result<Vec<RawCartRecord>, CatalogError> {
        let url = self.endpoint(&["carts"])?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let carts: Vec<RawCartRecord> = serde_json::from_str(&body)?;
        debug!(count = carts.len(), "Fetched carts");
        Ok(carts)
    }
}

impl CategoryLookup for CatalogClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_category(&self, product_id: &ProductId) -> Result<Category, CatalogError> {
        let id = product_id.to_string();
        let url = self.endpoint(&["products", id.as_str()])?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id.clone()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let category = parse_product_category(product_id, &body)?;
        debug!(category = %category, "Fetched product category");
        Ok(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client_for(base: &str) -> CatalogClient {
        let config = EtlConfig {
            request_timeout: Duration::from_secs(5),
            ..EtlConfig::with_api_url(Url::parse(base).unwrap())
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_on_root() {
        let client = client_for("https://fakestoreapi.com");
        assert_eq!(
            client.endpoint(&["products", "1"]).unwrap().as_str(),
            "https://fakestoreapi.com/products/1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for("https://catalog.internal/api/v1/");
        assert_eq!(
            client.endpoint(&["carts"]).unwrap().as_str(),
            "https://catalog.internal/api/v1/carts"
        );
    }

    #[test]
    fn test_endpoint_encodes_text_ids() {
        let client = client_for("https://fakestoreapi.com");
        assert_eq!(
            client.endpoint(&["products", "a/b c"]).unwrap().as_str(),
            "https://fakestoreapi.com/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_cannot_be_a_base() {
        let config = EtlConfig::with_api_url(Url::parse("mailto:catalog@example.com").unwrap());
        assert!(matches!(
            CatalogClient::new(&config),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = client_for("http://127.0.0.1:9");
        let err = client.get_category(&ProductId::int(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
