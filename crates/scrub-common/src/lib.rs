//! Shared utilities for the scrub crates.
//!
//! This crate provides the Polars helpers used across the workspace:
//! dtype predicates, `AnyValue` conversions and column name listing.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_f64, any_to_string, column_names, format_numeric, is_numeric_dtype, is_string_dtype,
};
