//! Per-user summary, the terminal output of a transform run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::UserId;

/// One user's cart activity summary.
///
/// Serializes as
/// `{"user_id": 7, "latest_cart_date": "2024-01-02T00:00:00.000Z", "top_category": "electronics"}`
/// with `top_category` set to `null` when none of the user's products
/// resolved to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    user_id: UserId,
    #[serde(rename = "latest_cart_date", with = "super::timestamp::cart_date")]
    latest_timestamp: DateTime<Utc>,
    top_category: Option<Category>,
}

impl UserSummary {
    #[must_use]
    pub const fn new(
        user_id: UserId,
        latest_timestamp: DateTime<Utc>,
        top_category: Option<Category>,
    ) -> Self {
        Self {
            user_id,
            latest_timestamp,
            top_category,
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Most recent cart timestamp seen for the user.
    #[must_use]
    pub const fn latest_timestamp(&self) -> DateTime<Utc> {
        self.latest_timestamp
    }

    /// Most frequently added category, if any product resolved.
    #[must_use]
    pub const fn top_category(&self) -> Option<&Category> {
        self.top_category.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_serialize_with_category() {
        let summary = UserSummary::new(
            UserId::int(7),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            Some(Category::parse("electronics").unwrap()),
        );
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"user_id":7,"latest_cart_date":"2024-01-02T00:00:00.000Z","top_category":"electronics"}"#
        );
    }

    #[test]
    fn test_serialize_without_category() {
        let summary = UserSummary::new(
            UserId::text("u9"),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap(),
            None,
        );
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"user_id":"u9","latest_cart_date":"2024-01-01T12:30:00.000Z","top_category":null}"#
        );
    }

    #[test]
    fn test_deserialize() {
        let summary: UserSummary = serde_json::from_str(
            r#"{"user_id":7,"latest_cart_date":"2024-01-02T00:00:00.000Z","top_category":null}"#,
        )
        .unwrap();
        assert_eq!(summary.user_id(), &UserId::int(7));
        assert!(summary.top_category().is_none());
    }
}
