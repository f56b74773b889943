//! Cart records, raw and validated.
//!
//! [`RawCartRecord`] mirrors the catalog service's `/carts` payload with
//! every field optional and untyped, so a record with a missing or wrongly
//! typed field still decodes and is rejected by [`CartRecord::validate`] with
//! its position. `validate` is the only way to obtain a [`CartRecord`], so
//! anything downstream can rely on a user id, a parsed timestamp and a
//! complete product list being present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{ProductId, UserId};
use super::timestamp::parse_cart_date;

/// A cart record exactly as decoded from JSON.
///
/// Unknown fields (`id`, `__v`, per-product `quantity`) are ignored. A JSON
/// `null` decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Value>,
}

impl RawCartRecord {
    /// Build a well-formed raw record.
    #[must_use]
    pub fn new(user_id: &UserId, date: &str, products: &[ProductId]) -> Self {
        Self {
            user_id: Some(serde_json::json!(user_id)),
            date: Some(Value::String(date.to_string())),
            products: Some(Value::Array(
                products
                    .iter()
                    .map(|product_id| serde_json::json!({ "productId": product_id }))
                    .collect(),
            )),
        }
    }
}

/// Why a raw record failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("missing userId")]
    MissingUserId,
    #[error("userId {value} is not an integer or string")]
    InvalidUserId { value: String },
    #[error("missing date")]
    MissingDate,
    #[error("unparseable date {value}: {message}")]
    UnparseableDate { value: String, message: String },
    #[error("missing products")]
    MissingProducts,
    #[error("products {value} is not an array")]
    InvalidProducts { value: String },
    #[error("product {index} is missing productId")]
    MissingProductId { index: usize },
    #[error("product {index} has productId {value}, which is not an integer or string")]
    InvalidProductId { index: usize, value: String },
}

/// A cart record that cannot be aggregated.
///
/// Fatal for the whole run: no summaries are emitted once one of these is seen.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("cart record at position {position} is malformed: {reason}")]
pub struct MalformedRecordError {
    /// Zero-based position of the record in the input sequence.
    pub position: usize,
    pub reason: MalformedReason,
}

/// A product line of a validated [`CartRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub product_id: ProductId,
}

/// A validated cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    user_id: UserId,
    timestamp: DateTime<Utc>,
    products: Vec<CartProduct>,
}

impl CartRecord {
    /// Build a record from already-validated parts.
    #[must_use]
    pub const fn new(user_id: UserId, timestamp: DateTime<Utc>, products: Vec<CartProduct>) -> Self {
        Self {
            user_id,
            timestamp,
            products,
        }
    }

    /// Validate a raw record found at `position` in the input.
    ///
    /// Fields are checked in order: `userId`, `date`, `products`, then each
    /// product's `productId`. The first failure wins. A present field of the
    /// wrong JSON type is reported as invalid rather than missing.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] describing the first missing or
    /// unparseable field.
    pub fn validate(raw: RawCartRecord, position: usize) -> Result<Self, MalformedRecordError> {
        let malformed = |reason| MalformedRecordError { position, reason };

        let user_id = raw.user_id.ok_or_else(|| malformed(MalformedReason::MissingUserId))?;
        let user_id = serde_json::from_value::<UserId>(user_id.clone()).map_err(|_| {
            malformed(MalformedReason::InvalidUserId {
                value: user_id.to_string(),
            })
        })?;

        let date = raw.date.ok_or_else(|| malformed(MalformedReason::MissingDate))?;
        let timestamp = match &date {
            Value::String(s) => parse_cart_date(s).map_err(|e| e.to_string()),
            _ => Err("expected a string".to_string()),
        }
        .map_err(|message| {
            malformed(MalformedReason::UnparseableDate {
                value: date.to_string(),
                message,
            })
        })?;

        let raw_products = match raw.products {
            None => return Err(malformed(MalformedReason::MissingProducts)),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(malformed(MalformedReason::InvalidProducts {
                    value: other.to_string(),
                }));
            }
        };

        let products = raw_products
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item.get("productId") {
                None | Some(Value::Null) => {
                    Err(malformed(MalformedReason::MissingProductId { index }))
                }
                Some(value) => serde_json::from_value::<ProductId>(value.clone())
                    .map(|product_id| CartProduct { product_id })
                    .map_err(|_| {
                        malformed(MalformedReason::InvalidProductId {
                            index,
                            value: value.to_string(),
                        })
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            user_id,
            timestamp,
            products,
        })
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn products(&self) -> &[CartProduct] {
        &self.products
    }
}
