//! Deriving a contract from a sample dataset.

use polars::prelude::*;
use scrub_common::is_numeric_dtype;
use scrub_model::{ColumnSpec, DataContract, ValueType};
use scrub_transform::value_type_of;
use tracing::debug;

/// Describe `df` as a contract.
///
/// Each column gets its type family, `nullable` when it holds nulls, and for
/// numeric columns the observed minimum and maximum. Columns of a type with
/// no canonical name are declared as strings.
pub fn infer_contract(df: &DataFrame, strict: bool) -> DataContract {
    let mut contract = DataContract::new().with_strict(strict);
    for column in df.get_columns() {
        let dtype = column.dtype();
        let value_type = value_type_of(dtype).unwrap_or_else(|| {
            debug!(column = %column.name(), %dtype, "no canonical type; declaring string");
            ValueType::String
        });
        let mut spec = ColumnSpec::new(value_type).with_nullable(column.null_count() > 0);
        if is_numeric_dtype(dtype) {
            let (min, max) = numeric_bounds(column);
            spec = spec.with_range(min, max);
        }
        contract = contract.with_column(column.name().to_string(), spec);
    }
    contract
}

fn numeric_bounds(column: &Column) -> (Option<f64>, Option<f64>) {
    let Ok(values) = column.cast(&DataType::Float64) else {
        return (None, None);
    };
    match values.f64() {
        Ok(ca) => (ca.min(), ca.max()),
        Err(_) => (None, None),
    }
}
