//! Casting contract columns to their declared types.

use polars::prelude::{AnyValue, DataFrame};
use scrub_model::DataContract;
use scrub_transform::polars_dtype;
use tracing::debug;

use crate::checks::Offenders;
use crate::error::Result;
use crate::issue::ContractIssue;

/// Cast every present contract column to its declared type.
///
/// Casts are lenient: a value that cannot be converted is reported as a
/// [`ContractIssue::CoercionFailed`] and becomes null in the returned frame.
pub fn coerce(df: &DataFrame, contract: &DataContract) -> Result<(DataFrame, Vec<ContractIssue>)> {
    let mut out = df.clone();
    let mut issues = Vec::new();

    for (name, spec) in &contract.columns {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let target = polars_dtype(spec.dtype);
        if column.dtype() == &target {
            continue;
        }
        let mut failed = Offenders::default();
        let cast = match column.cast(&target) {
            Ok(cast) => cast,
            Err(err) => {
                debug!(column = %name, %target, error = %err, "cast rejected");
                for idx in 0..column.len() {
                    let value = column.get(idx).unwrap_or(AnyValue::Null);
                    if !value.is_null() {
                        failed.record(value);
                    }
                }
                issues.push(coercion_failed(name, spec.dtype, failed));
                continue;
            }
        };
        for idx in 0..column.len() {
            let before = column.get(idx).unwrap_or(AnyValue::Null);
            if before.is_null() {
                continue;
            }
            if cast.get(idx).map(|after| after.is_null()).unwrap_or(true) {
                failed.record(before);
            }
        }
        if !failed.is_empty() {
            issues.push(coercion_failed(name, spec.dtype, failed));
        }
        out.with_column(cast)?;
    }

    Ok((out, issues))
}

fn coercion_failed(
    name: &str,
    expected: scrub_model::ValueType,
    failed: Offenders,
) -> ContractIssue {
    ContractIssue::CoercionFailed {
        column: name.to_string(),
        expected,
        count: failed.count,
        samples: failed.samples,
    }
}
