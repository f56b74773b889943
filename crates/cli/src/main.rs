//! Cart Summary CLI - extract, transform and load per-user cart summaries.
//!
//! # Usage
//!
//! ```bash
//! # Fetch raw carts from the catalog service
//! cs-cli extract --output data/carts.json
//!
//! # Summarize a saved cart file against the live catalog
//! cs-cli transform --input data/carts.json --output output/user_cart_summary.json
//!
//! # Summarize offline against a saved /products listing
//! cs-cli transform --input data/carts.json --catalog data/products.json
//!
//! # Extract, transform and load in one go
//! cs-cli run --output output/user_cart_summary.json --prefetch 8
//! ```
//!
//! # Commands
//!
//! - `extract` - Write the catalog's raw cart records to a file or stdout
//! - `transform` - Summarize cart records from a file
//! - `run` - Full extract → transform → load
//!
//! Exits with status 1 on any failure, including a single malformed cart
//! record. Retrying is left to whatever invoked the command.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroUsize;
use std::path::PathBuf;

use cart_summary_etl::{Destination, EtlConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Cart summary ETL tools")]
struct Cli {
    /// Catalog service base URL (overrides `FAKE_STORE_API_URL`)
    #[arg(long, global = true, value_parser = parse_api_url)]
    api_url: Option<Url>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw cart records from the catalog service
    Extract {
        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Destination,
    },
    /// Summarize cart records read from a file
    Transform {
        /// JSON array of cart records
        #[arg(short, long)]
        input: PathBuf,

        /// Saved `/products` listing to resolve categories offline
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Destination,

        /// Concurrent category lookups before aggregation
        #[arg(long)]
        prefetch: Option<NonZeroUsize>,
    },
    /// Extract, transform and load in one invocation
    Run {
        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Destination,

        /// Concurrent category lookups before aggregation
        #[arg(long)]
        prefetch: Option<NonZeroUsize>,
    },
}

fn parse_api_url(value: &str) -> Result<Url, String> {
    cart_summary_etl::config::parse_api_url(value, "--api-url").map_err(|e| e.to_string())
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &EtlConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json_logs: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_summary_etl=info,cs_cli=info".into());

    // Logs go to stderr so `--output -` keeps stdout clean JSON
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = EtlConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    init_tracing(cli.json_logs);

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: EtlConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    match cli.command {
        Commands::Extract { output } => commands::extract::run(&config, &output).await?,
        Commands::Transform {
            input,
            catalog,
            output,
            prefetch,
        } => {
            if let Some(prefetch) = prefetch {
                config.prefetch_concurrency = prefetch;
            }
            commands::transform::run(&config, &input, catalog.as_deref(), &output).await?;
        }
        Commands::Run { output, prefetch } => {
            if let Some(prefetch) = prefetch {
                config.prefetch_concurrency = prefetch;
            }
            commands::etl::run(&config, &output).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_transform_args() {
        let cli = Cli::try_parse_from([
            "cs-cli",
            "transform",
            "--input",
            "carts.json",
            "--output",
            "out.json",
            "--prefetch",
            "4",
        ])
        .expect("valid arguments");

        match cli.command {
            Commands::Transform {
                input,
                catalog,
                output,
                prefetch,
            } => {
                assert_eq!(input, PathBuf::from("carts.json"));
                assert!(catalog.is_none());
                assert_eq!(output, Destination::File(PathBuf::from("out.json")));
                assert_eq!(prefetch.map(NonZeroUsize::get), Some(4));
            }
            _ => panic!("expected transform"),
        }
    }

    #[test]
    fn test_output_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["cs-cli", "run"]).expect("valid arguments");
        assert!(matches!(
            cli.command,
            Commands::Run {
                output: Destination::Stdout,
                prefetch: None
            }
        ));
    }

    #[test]
    fn test_rejects_zero_prefetch() {
        assert!(Cli::try_parse_from(["cs-cli", "run", "--prefetch", "0"]).is_err());
    }

    #[test]
    fn test_rejects_bad_api_url() {
        assert!(Cli::try_parse_from(["cs-cli", "--api-url", "nope", "extract"]).is_err());
    }
}
