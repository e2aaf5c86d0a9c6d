//! SQLite persistence for scrub datasets.
//!
//! [`SqliteStore`] saves frames as tables, loads them back with their column
//! types, and runs ad-hoc SQL.

mod convert;
pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{IN_MEMORY, IfExists, SqliteStore};
