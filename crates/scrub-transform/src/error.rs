//! Error types for cleaning operations.

use polars::prelude::PolarsError;
use scrub_model::{CleaningOperation, ValueType};
use thiserror::Error;

/// Errors raised while dispatching or running an operation.
///
/// Columns of an incompatible type and selector names missing from the
/// dataset are not errors; operations skip them.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The registry holds no entry for the operation.
    #[error("unknown operation '{operation}'")]
    UnknownOperation { operation: String },

    /// A parameter has the wrong shape or an unsupported value.
    #[error("invalid parameter `{parameter}` for {operation}: {message}")]
    InvalidParameter {
        operation: CleaningOperation,
        parameter: String,
        message: String,
    },

    /// A strict cast met a value it could not convert.
    #[error("failed to cast column '{column}' to {dtype}: {message}")]
    Cast {
        column: String,
        dtype: ValueType,
        message: String,
    },

    /// The compute engine rejected an operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
