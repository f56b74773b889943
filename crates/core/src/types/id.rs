//! Newtype IDs for opaque upstream identifiers.
//!
//! The catalog service hands out user and product ids as JSON integers, but
//! nothing guarantees it always will. Ids therefore wrap an [`IdValue`] that
//! keeps whichever representation arrived, so summaries echo ids back exactly
//! as the upstream wrote them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Raw representation of an opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    /// Numeric id, e.g. `7`.
    Int(i64),
    /// Textual id, e.g. `"sku-7"`.
    Text(String),
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`IdValue`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Constructors: `int()`, `text()`
/// - `From<i64>`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use cart_summary_core::define_id;
/// define_id!(UserId);
/// define_id!(ProductId);
///
/// let user_id = UserId::int(1);
/// let product_id = ProductId::int(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::IdValue);

        impl $name {
            /// Create a numeric ID.
            #[must_use]
            pub const fn int(id: i64) -> Self {
                Self($crate::IdValue::Int(id))
            }

            /// Create a textual ID.
            #[must_use]
            pub fn text(id: impl Into<String>) -> Self {
                Self($crate::IdValue::Text(id.into()))
            }

            /// Get the underlying representation.
            #[must_use]
            pub const fn value(&self) -> &$crate::IdValue {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::int(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::text(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::text(id)
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_id_keeps_json_number() {
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId::int(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_text_id_keeps_json_string() {
        let id: ProductId = serde_json::from_str("\"sku-7\"").unwrap();
        assert_eq!(id, ProductId::text("sku-7"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sku-7\"");
    }

    #[test]
    fn test_int_and_text_are_distinct() {
        assert_ne!(UserId::int(7), UserId::text("7"));
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::int(42).to_string(), "42");
        assert_eq!(ProductId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_rejects_non_scalar() {
        assert!(serde_json::from_str::<UserId>("{\"id\": 1}").is_err());
        assert!(serde_json::from_str::<UserId>("null").is_err());
    }
}
