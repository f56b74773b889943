//! Cart timestamp parsing and formatting.
//!
//! Cart dates arrive as `2020-03-02T00:00:00.000Z`: ISO-8601, fractional
//! seconds, literal `Z`. Summaries are written back in the same shape with
//! millisecond precision.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format accepted on input. `%.f` also tolerates a missing fraction.
pub const CART_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Format written on output.
pub const CART_DATE_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse a cart date into a UTC instant.
///
/// # Errors
///
/// Returns the `chrono` parse error if the input is not a UTC ISO-8601
/// timestamp ending in `Z`.
pub fn parse_cart_date(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, CART_DATE_INPUT_FORMAT).map(|naive| naive.and_utc())
}

/// Format a UTC instant as a cart date.
///
/// Output always has exactly three fractional digits. Anything finer is
/// truncated, not rounded, so `2024-01-01T00:00:00.123456Z` is written as
/// `2024-01-01T00:00:00.123Z` and does not survive a parse/format round trip.
#[must_use]
pub fn format_cart_date(ts: &DateTime<Utc>) -> String {
    ts.format(CART_DATE_OUTPUT_FORMAT).to_string()
}

/// Serde adapter for `#[serde(with = "...")]` on `DateTime<Utc>` fields.
pub mod cart_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as a cart date string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_cart_date(ts))
    }

    /// Deserialize from a cart date string.
    ///
    /// # Errors
    ///
    /// Fails if the string does not parse as a cart date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_cart_date(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn test_parse_millis() {
        let ts = parse_cart_date("2024-01-02T03:04:05.678Z").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
                + chrono::Duration::milliseconds(678)
        );
    }

    #[test]
    fn test_parse_without_fraction() {
        let ts = parse_cart_date("2024-01-02T03:04:05Z").unwrap();
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_cart_date("yesterday").is_err());
        assert!(parse_cart_date("").is_err());
        assert!(parse_cart_date("2024-13-01T00:00:00.000Z").is_err());
    }

    #[test]
    fn test_parse_requires_utc_designator() {
        assert!(parse_cart_date("2024-01-02T03:04:05.000").is_err());
        assert!(parse_cart_date("2024-01-02T03:04:05.000+02:00").is_err());
    }

    #[test]
    fn test_format_pads_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(format_cart_date(&ts), "2024-01-02T00:00:00.000Z");
    }

    #[test]
    fn test_format_truncates_below_millis() {
        let ts = parse_cart_date("2024-01-01T00:00:00.123456Z").unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);
        assert_eq!(format_cart_date(&ts), "2024-01-01T00:00:00.123Z");

        let ts = parse_cart_date("2024-01-01T00:00:00.9999Z").unwrap();
        assert_eq!(format_cart_date(&ts), "2024-01-01T00:00:00.999Z");
    }

    #[test]
    fn test_format_parse_agree() {
        let input = "2020-03-02T00:00:00.000Z";
        assert_eq!(format_cart_date(&parse_cart_date(input).unwrap()), input);
    }
}
