//! Core types for cart summaries.
//!
//! This module provides type-safe wrappers for the domain concepts of the
//! transform step.

pub mod cart;
pub mod category;
pub mod id;
pub mod summary;
pub mod timestamp;

pub use cart::{CartProduct, CartRecord, MalformedReason, MalformedRecordError, RawCartRecord};
pub use category::{Category, CategoryError};
pub use id::*;
pub use summary::UserSummary;
pub use timestamp::{format_cart_date, parse_cart_date};
