//! Product category type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The input string is empty or only whitespace.
    #[error("category cannot be empty")]
    Empty,
}

/// A catalog category name, such as `"electronics"` or `"jewelery"`.
///
/// Names are compared exactly as the catalog spells them; no case folding or
/// trimming happens beyond rejecting blank input.
///
/// ## Examples
///
/// ```
/// use cart_summary_core::Category;
///
/// assert!(Category::parse("electronics").is_ok());
/// assert!(Category::parse("").is_err());
/// assert!(Category::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Parse a `Category` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Empty`] if the input is blank.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        if s.trim().is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the category name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Category` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(s))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
