//! Column resolution and the cleaning operation catalog.
//!
//! [`resolve_columns`] turns a rule's selector into the columns a frame
//! actually has; [`OperationRegistry`] dispatches an operation identifier to
//! its implementation in [`operations`].

pub mod error;
pub mod operations;
pub mod params;
pub mod registry;
pub mod resolve;

pub use error::{Result, TransformError};
pub use operations::{polars_dtype, value_type_of};
pub use params::Params;
pub use registry::{OperationFn, OperationRegistry};
pub use resolve::{resolve, resolve_columns};
