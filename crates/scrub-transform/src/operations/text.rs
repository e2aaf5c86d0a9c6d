use std::borrow::Cow;

use polars::prelude::*;
use regex::Regex;
use scrub_common::is_string_dtype;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::operations::nulls::with_exprs;
use crate::params::{Params, literal, literal_fits};

/// Rewrite each non-null value of the string columns among `columns`.
fn map_strings<F>(mut df: DataFrame, columns: &[String], f: F) -> Result<DataFrame>
where
    F: for<'x> Fn(&'x str) -> Cow<'x, str> + Copy,
{
    for name in columns {
        let column = df.column(name)?;
        if !is_string_dtype(column.dtype()) {
            debug!(column = %name, dtype = %column.dtype(), "skipping non-string column");
            continue;
        }
        let updated: StringChunked = column.str()?.apply_values(f);
        df.with_column(updated.into_series())?;
    }
    Ok(df)
}

pub fn trim_whitespace(
    df: DataFrame,
    columns: &[String],
    _params: &Params<'_>,
) -> Result<DataFrame> {
    map_strings(df, columns, |value: &str| Cow::Borrowed(value.trim()))
}

pub fn lowercase(df: DataFrame, columns: &[String], _params: &Params<'_>) -> Result<DataFrame> {
    map_strings(df, columns, |value: &str| Cow::Owned(value.to_lowercase()))
}

pub fn uppercase(df: DataFrame, columns: &[String], _params: &Params<'_>) -> Result<DataFrame> {
    map_strings(df, columns, |value: &str| Cow::Owned(value.to_uppercase()))
}

/// Replace values in `columns`.
///
/// With `value` set, cells equal to it become `replacement`. Otherwise, with
/// `pattern` set, every regex match in a string cell is substituted by
/// `replacement`. The replacement defaults to the empty string. With `value`
/// set, an explicit `null` replacement turns matching cells into nulls. With neither
/// parameter the frame is returned unchanged.
pub fn replace(df: DataFrame, columns: &[String], params: &Params<'_>) -> Result<DataFrame> {
    if let Some(target) = params.get("value") {
        return replace_exact(df, columns, params, target);
    }
    let Some(pattern) = params.str("pattern")? else {
        debug!("neither value nor pattern given; leaving data unchanged");
        return Ok(df);
    };
    let regex = Regex::new(pattern).map_err(|e| params.invalid("pattern", e.to_string()))?;
    let replacement = params.str("replacement")?.unwrap_or_default();
    map_strings(df, columns, |value: &str| {
        regex.replace_all(value, replacement)
    })
}

fn replace_exact(
    df: DataFrame,
    columns: &[String],
    params: &Params<'_>,
    target: &Value,
) -> Result<DataFrame> {
    if params.is_null("replacement") {
        return null_exact(df, columns, params, target);
    }
    let replacement = params
        .get("replacement")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));

    if let (Value::String(from), Value::String(to)) = (target, &replacement) {
        let (from, to) = (from.as_str(), to.as_str());
        return map_strings(df, columns, |value: &str| {
            if value == from {
                Cow::Owned(to.to_string())
            } else {
                Cow::Borrowed(value)
            }
        });
    }

    let (Some(from), Some(to)) = (literal(target), literal(&replacement)) else {
        return Err(params.invalid("value", "value and replacement must be scalars"));
    };
    let mut exprs = Vec::new();
    for name in columns {
        let dtype = df.column(name)?.dtype();
        if !literal_fits(dtype, target) || !literal_fits(dtype, &replacement) {
            debug!(column = %name, %dtype, "replacement does not fit column type; skipping");
            continue;
        }
        let current = col(name.as_str());
        exprs.push(
            when(current.clone().eq(from.clone()))
                .then(to.clone())
                .otherwise(current)
                .alias(name.as_str()),
        );
    }
    with_exprs(df, exprs)
}

/// Null out cells equal to `target`, keeping each column's type.
fn null_exact(
    df: DataFrame,
    columns: &[String],
    params: &Params<'_>,
    target: &Value,
) -> Result<DataFrame> {
    let Some(from) = literal(target) else {
        return Err(params.invalid("value", "value must be a scalar"));
    };
    let mut exprs = Vec::new();
    for name in columns {
        let dtype = df.column(name)?.dtype();
        if !literal_fits(dtype, target) {
            debug!(column = %name, %dtype, "value does not fit column type; skipping");
            continue;
        }
        let current = col(name.as_str());
        exprs.push(
            when(current.clone().eq(from.clone()))
                .then(lit(Null {}).cast(dtype.clone()))
                .otherwise(current)
                .alias(name.as_str()),
        );
    }
    with_exprs(df, exprs)
}
