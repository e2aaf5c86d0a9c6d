//! Declared type checks.

use polars::prelude::{Column, DataType};
use scrub_model::ColumnSpec;
use scrub_transform::value_type_of;

use crate::issue::ContractIssue;

/// Compare the column's type family with the declared one.
///
/// Columns typed `Null` (entirely null, no inferred type) fit any declaration.
pub fn check(name: &str, column: &Column, spec: &ColumnSpec) -> Option<ContractIssue> {
    let dtype = column.dtype();
    if matches!(dtype, DataType::Null) || value_type_of(dtype) == Some(spec.dtype) {
        return None;
    }
    Some(ContractIssue::TypeMismatch {
        column: name.to_string(),
        expected: spec.dtype,
        found: dtype.to_string(),
    })
}
