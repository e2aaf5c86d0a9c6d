//! Operation dispatch.

use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::DataFrame;
use scrub_model::{CleaningOperation, Parameters};
use tracing::debug_span;

use crate::error::{Result, TransformError};
use crate::operations;
use crate::params::Params;

/// Signature shared by every operation implementation.
pub type OperationFn = fn(DataFrame, &[String], &Params<'_>) -> Result<DataFrame>;

const STANDARD: [(CleaningOperation, OperationFn); 11] = [
    (CleaningOperation::DropNulls, operations::drop_nulls),
    (CleaningOperation::FillNulls, operations::fill_nulls),
    (CleaningOperation::DropDuplicates, operations::drop_duplicates),
    (CleaningOperation::TrimWhitespace, operations::trim_whitespace),
    (CleaningOperation::Lowercase, operations::lowercase),
    (CleaningOperation::Uppercase, operations::uppercase),
    (CleaningOperation::Replace, operations::replace),
    (CleaningOperation::CastType, operations::cast_type),
    (CleaningOperation::Filter, operations::filter_rows),
    (CleaningOperation::RemoveOutliers, operations::remove_outliers),
    (CleaningOperation::Standardize, operations::standardize),
];

/// Mapping from operation identifier to implementation.
///
/// The standard registry covers every operation except `validate`, which is
/// handled by contracts; dispatching it reports an unknown operation.
#[derive(Clone)]
pub struct OperationRegistry {
    entries: BTreeMap<CleaningOperation, OperationFn>,
}

impl OperationRegistry {
    pub fn standard() -> Self {
        Self {
            entries: STANDARD.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register or replace the implementation for `operation`.
    #[must_use]
    pub fn with(mut self, operation: CleaningOperation, implementation: OperationFn) -> Self {
        self.entries.insert(operation, implementation);
        self
    }

    #[must_use]
    pub fn without(mut self, operation: CleaningOperation) -> Self {
        self.entries.remove(&operation);
        self
    }

    pub fn get(&self, operation: CleaningOperation) -> Option<OperationFn> {
        self.entries.get(&operation).copied()
    }

    pub fn contains(&self, operation: CleaningOperation) -> bool {
        self.entries.contains_key(&operation)
    }

    /// Registered operations in catalog order.
    pub fn operations(&self) -> impl Iterator<Item = CleaningOperation> + '_ {
        self.entries.keys().copied()
    }

    /// Run `operation` on `df` over the already-resolved `columns`.
    pub fn apply(
        &self,
        operation: CleaningOperation,
        df: DataFrame,
        columns: &[String],
        parameters: &Parameters,
    ) -> Result<DataFrame> {
        let implementation = self
            .get(operation)
            .ok_or_else(|| TransformError::UnknownOperation {
                operation: operation.to_string(),
            })?;
        let _span = debug_span!("operation", name = %operation, columns = columns.len()).entered();
        implementation(df, columns, &Params::new(operation, parameters))
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
