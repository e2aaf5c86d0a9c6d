use polars::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::params::{Params, comparable};

/// Keep the rows where the first of `columns` satisfies `operator value`.
///
/// Operators: `==` (default), `!=`, `>`, `>=`, `<`, `<=` and `in` (with a
/// list value). Rows whose cell is null never match. Date and datetime
/// columns compare against ISO date or timestamp strings. A missing value, an
/// unknown operator or a value that cannot be compared with the column
/// leaves the frame unchanged.
pub fn filter_rows(df: DataFrame, columns: &[String], params: &Params<'_>) -> Result<DataFrame> {
    let Some(value) = params.get("value") else {
        debug!("no filter value given; leaving data unchanged");
        return Ok(df);
    };
    let Some(first) = columns.first() else {
        return Ok(df);
    };
    let operator = params.str("operator")?.unwrap_or("==");
    let dtype = df.column(first)?.dtype().clone();
    let target = col(first.as_str());

    let predicate = if operator == "in" {
        let Value::Array(items) = value else {
            return Err(params.invalid("value", "operator 'in' expects a list"));
        };
        let mut candidates = Vec::new();
        for item in items {
            match comparable(&dtype, item) {
                Some(candidate) => candidates.push(target.clone().eq(candidate)),
                None => debug!(column = %first, %dtype, "ignoring list member of another type"),
            }
        }
        candidates
            .into_iter()
            .reduce(|acc, next| acc.or(next))
            .unwrap_or_else(|| lit(false))
    } else {
        let Some(rhs) = comparable(&dtype, value) else {
            debug!(column = %first, %dtype, "filter value does not fit column type; skipping");
            return Ok(df);
        };
        match operator {
            "==" => target.eq(rhs),
            "!=" => target.neq(rhs),
            ">" => target.gt(rhs),
            ">=" => target.gt_eq(rhs),
            "<" => target.lt(rhs),
            "<=" => target.lt_eq(rhs),
            other => {
                debug!(operator = other, "unsupported filter operator; leaving data unchanged");
                return Ok(df);
            }
        }
    };
    Ok(df.lazy().filter(predicate).collect()?)
}
