//! ETL configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FAKE_STORE_API_URL` - Catalog service base URL (default: `https://fakestoreapi.com`)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `CART_SUMMARY_PREFETCH_CONCURRENCY` - Concurrent category lookups before
//!   aggregation (default: 1, sequential)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::num::NonZeroUsize;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://fakestoreapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// ETL configuration.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    /// Catalog service base URL
    pub api_url: Url,
    /// Timeout applied to every catalog request
    pub request_timeout: Duration,
    /// Concurrent category lookups issued before aggregation
    pub prefetch_concurrency: NonZeroUsize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl EtlConfig {
    /// Configuration for `api_url` with every other setting at its default.
    #[must_use]
    pub const fn with_api_url(api_url: Url) -> Self {
        Self {
            api_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            prefetch_concurrency: NonZeroUsize::MIN,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = var("FAKE_STORE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&api_url, "FAKE_STORE_API_URL")?;

        let request_timeout = match var("CATALOG_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_positive(&value, "CATALOG_TIMEOUT_SECS")?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let prefetch_concurrency = match var("CART_SUMMARY_PREFETCH_CONCURRENCY") {
            Some(value) => parse_concurrency(&value, "CART_SUMMARY_PREFETCH_CONCURRENCY")?,
            None => NonZeroUsize::MIN,
        };

        Ok(Self {
            request_timeout,
            prefetch_concurrency,
            sentry_dsn: var("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
            ..Self::with_api_url(api_url)
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a catalog base URL. Must be http(s) and able to carry a path.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `var_name` on failure.
pub fn parse_api_url(value: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected an http(s) URL, got {value}"),
        ));
    }

    Ok(url)
}

/// Parse a concurrency limit; zero is rejected.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `var_name` on failure.
pub fn parse_concurrency(value: &str, var_name: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .parse::<NonZeroUsize>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

fn parse_positive(value: &str, var_name: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<EtlConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EtlConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.prefetch_concurrency.get(), 1);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FAKE_STORE_API_URL", "http://localhost:8080/api/"),
            ("CATALOG_TIMEOUT_SECS", "5"),
            ("CART_SUMMARY_PREFETCH_CONCURRENCY", "8"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.prefetch_concurrency.get(), 8);
        assert_eq!(
            config.sentry_dsn.as_deref(),
            Some("https://key@sentry.example/1")
        );
    }

    #[test]
    fn test_with_api_url_matches_env_defaults() {
        let from_env = load(&[]).unwrap();
        let config = EtlConfig::with_api_url(Url::parse("http://localhost:8080").unwrap());
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.request_timeout, from_env.request_timeout);
        assert_eq!(config.prefetch_concurrency, from_env.prefetch_concurrency);
        assert!(config.sentry_dsn.is_none());
        assert!(config.sentry_environment.is_none());
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_url() {
        let err = load(&[("FAKE_STORE_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "FAKE_STORE_API_URL"));
    }

    #[test]
    fn test_non_http_url() {
        assert!(load(&[("FAKE_STORE_API_URL", "ftp://catalog.example")]).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = load(&[("CART_SUMMARY_PREFETCH_CONCURRENCY", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load(&[("CATALOG_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("CATALOG_TIMEOUT_SECS", "soon")]).is_err());
    }
}
