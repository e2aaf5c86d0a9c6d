use polars::prelude::*;
use scrub_common::is_numeric_dtype;
use tracing::debug;

use crate::error::Result;
use crate::params::{Params, literal, literal_fits};

/// Drop every row holding a null in any of `columns`.
pub fn drop_nulls(df: DataFrame, columns: &[String], _params: &Params<'_>) -> Result<DataFrame> {
    let mut mask: Option<BooleanChunked> = None;
    for name in columns {
        let present = df.column(name)?.is_not_null();
        mask = Some(match mask {
            Some(mask) => &mask & &present,
            None => present,
        });
    }
    match mask {
        Some(mask) => Ok(df.filter(&mask)?),
        None => Ok(df),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillStrategy {
    Value,
    Forward,
    Backward,
    Mean,
    Median,
}

impl FillStrategy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "value" | "literal" => Some(Self::Value),
            "forward" | "ffill" => Some(Self::Forward),
            "backward" | "bfill" => Some(Self::Backward),
            "mean" => Some(Self::Mean),
            "median" => Some(Self::Median),
            _ => None,
        }
    }
}

/// Fill nulls in `columns`.
///
/// `strategy` is one of `value` (the default, using the `value` parameter),
/// `forward`, `backward`, `mean` or `median`. Mean and median apply to
/// numeric columns only and use the column's own statistic computed before
/// filling. An unrecognized strategy leaves the frame unchanged.
pub fn fill_nulls(df: DataFrame, columns: &[String], params: &Params<'_>) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df);
    }
    let raw_strategy = params.str("strategy")?.unwrap_or("value");
    let Some(strategy) = FillStrategy::parse(raw_strategy) else {
        debug!(strategy = raw_strategy, "unsupported fill strategy; leaving data unchanged");
        return Ok(df);
    };

    match strategy {
        FillStrategy::Value => fill_with_value(df, columns, params),
        FillStrategy::Forward => fill_directional(df, columns, FillNullStrategy::Forward(None)),
        FillStrategy::Backward => fill_directional(df, columns, FillNullStrategy::Backward(None)),
        FillStrategy::Mean | FillStrategy::Median => {
            let mut exprs = Vec::new();
            for name in columns {
                let dtype = df.column(name)?.dtype();
                if !is_numeric_dtype(dtype) {
                    debug!(column = %name, %dtype, "skipping non-numeric column");
                    continue;
                }
                let target = col(name.as_str());
                let statistic = if strategy == FillStrategy::Mean {
                    target.clone().mean()
                } else {
                    target.clone().median()
                };
                exprs.push(target.fill_null(statistic).alias(name.as_str()));
            }
            with_exprs(df, exprs)
        }
    }
}

fn fill_with_value(df: DataFrame, columns: &[String], params: &Params<'_>) -> Result<DataFrame> {
    let Some(value) = params.get("value") else {
        debug!("no fill value given; leaving data unchanged");
        return Ok(df);
    };
    let Some(fill) = literal(value) else {
        return Err(params.invalid("value", format!("expected a scalar, got {value}")));
    };
    let mut exprs = Vec::new();
    for name in columns {
        let dtype = df.column(name)?.dtype();
        if !literal_fits(dtype, value) {
            debug!(column = %name, %dtype, "fill value does not fit column type; skipping");
            continue;
        }
        exprs.push(col(name.as_str()).fill_null(fill.clone()).alias(name.as_str()));
    }
    with_exprs(df, exprs)
}

fn fill_directional(
    mut df: DataFrame,
    columns: &[String],
    strategy: FillNullStrategy,
) -> Result<DataFrame> {
    for name in columns {
        let filled = df
            .column(name)?
            .as_materialized_series()
            .fill_null(strategy)?;
        df.with_column(filled)?;
    }
    Ok(df)
}

pub(crate) fn with_exprs(df: DataFrame, exprs: Vec<Expr>) -> Result<DataFrame> {
    if exprs.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(exprs).collect()?)
}
