//! Cart Summary Core - Shared types library.
//!
//! This crate provides the domain types used across all cart summary components:
//! - `etl` - Catalog client, category resolution, per-user aggregation
//! - `cli` - Command-line entry point for extract, transform and load
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Opaque ids, categories, cart records, summaries and timestamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
