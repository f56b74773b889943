//! Load step: hand results to their destination as JSON.
//!
//! Output is a pretty-printed JSON array followed by a newline, written to a
//! file (parent directories are created) or to stdout.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use cart_summary_core::UserSummary;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {destination}: {source}")]
    Io {
        destination: Destination,
        source: std::io::Error,
    },
}

/// Where output goes. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Stdout)
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write any serializable value to `destination` as pretty JSON.
///
/// # Errors
///
/// Returns [`LoadError`] if serialization or the write fails.
pub async fn write_json<T: Serialize + ?Sized>(
    value: &T,
    destination: &Destination,
) -> Result<(), LoadError> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');

    let io_error = |source| LoadError::Io {
        destination: destination.clone(),
        source,
    };

    match destination {
        Destination::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&bytes).await.map_err(io_error)?;
            stdout.flush().await.map_err(io_error)?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
            }
            tokio::fs::write(path, &bytes).await.map_err(io_error)?;
        }
    }

    Ok(())
}

/// Write user summaries to `destination`.
///
/// # Errors
///
/// Returns [`LoadError`] if serialization or the write fails.
pub async fn write_summaries(
    summaries: &[UserSummary],
    destination: &Destination,
) -> Result<(), LoadError> {
    write_json(summaries, destination).await?;
    info!(count = summaries.len(), destination = %destination, "Summaries written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cart_summary_core::{Category, UserId, parse_cart_date};

    use super::*;

    #[test]
    fn test_destination_from_str() {
        assert_eq!("-".parse::<Destination>().unwrap(), Destination::Stdout);
        assert_eq!(
            "out/summary.json".parse::<Destination>().unwrap(),
            Destination::File(PathBuf::from("out/summary.json"))
        );
    }

    #[tokio::test]
    async fn test_write_summaries_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("user_cart_summary.json");
        let summaries = vec![
            UserSummary::new(
                UserId::int(7),
                parse_cart_date("2024-01-02T00:00:00.000Z").unwrap(),
                Some(Category::parse("electronics").unwrap()),
            ),
            UserSummary::new(
                UserId::int(9),
                parse_cart_date("2024-01-01T00:00:00.000Z").unwrap(),
                None,
            ),
        ];

        write_summaries(&summaries, &Destination::File(path.clone()))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"user_id": 7, "latest_cart_date": "2024-01-02T00:00:00.000Z", "top_category": "electronics"},
                {"user_id": 9, "latest_cart_date": "2024-01-01T00:00:00.000Z", "top_category": null}
            ])
        );
    }

    #[tokio::test]
    async fn test_write_empty_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        write_summaries(&[], &Destination::File(path.clone()))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }
}
