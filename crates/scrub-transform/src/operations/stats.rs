use polars::prelude::*;
use scrub_common::is_numeric_dtype;
use tracing::debug;

use crate::error::Result;
use crate::operations::nulls::with_exprs;
use crate::params::Params;

const DEFAULT_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutlierMethod {
    Iqr,
    ZScore,
}

impl OutlierMethod {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "iqr" => Some(Self::Iqr),
            "zscore" | "z_score" | "z-score" => Some(Self::ZScore),
            _ => None,
        }
    }
}

/// Drop rows whose value in a numeric column lies outside the method's bounds.
///
/// Columns are processed one after another, so bounds for a later column are
/// computed on rows that survived earlier columns. `iqr` keeps
/// `[Q1 - t*IQR, Q3 + t*IQR]`; `zscore` keeps values within `t` sample
/// standard deviations of the mean and skips columns with zero deviation.
/// Rows with a null in a processed column are dropped.
pub fn remove_outliers(
    mut df: DataFrame,
    columns: &[String],
    params: &Params<'_>,
) -> Result<DataFrame> {
    let raw_method = params.str("method")?.unwrap_or("iqr");
    let Some(method) = OutlierMethod::parse(raw_method) else {
        debug!(method = raw_method, "unsupported outlier method; leaving data unchanged");
        return Ok(df);
    };
    let threshold = params.f64("threshold")?.unwrap_or(DEFAULT_THRESHOLD);

    for name in columns {
        let column = df.column(name)?;
        if !is_numeric_dtype(column.dtype()) {
            debug!(column = %name, dtype = %column.dtype(), "skipping non-numeric column");
            continue;
        }
        let values = column.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        let bounds = match method {
            OutlierMethod::Iqr => {
                let q1 = ca.quantile(0.25, QuantileMethod::Nearest)?;
                let q3 = ca.quantile(0.75, QuantileMethod::Nearest)?;
                match (q1, q3) {
                    (Some(q1), Some(q3)) => {
                        let iqr = q3 - q1;
                        Some((q1 - threshold * iqr, q3 + threshold * iqr))
                    }
                    _ => None,
                }
            }
            OutlierMethod::ZScore => match (ca.mean(), ca.std(1)) {
                (Some(mean), Some(std)) if std > 0.0 => {
                    Some((mean - threshold * std, mean + threshold * std))
                }
                _ => None,
            },
        };
        let Some((lower, upper)) = bounds else {
            debug!(column = %name, "no bounds for column; skipping");
            continue;
        };
        let before = df.height();
        df = df
            .lazy()
            .filter(
                col(name.as_str())
                    .gt_eq(lit(lower))
                    .and(col(name.as_str()).lt_eq(lit(upper))),
            )
            .collect()?;
        debug!(column = %name, lower, upper, removed = before - df.height(), "outliers removed");
    }
    Ok(df)
}

/// Rescale numeric `columns` to zero mean and unit sample standard deviation.
pub fn standardize(df: DataFrame, columns: &[String], _params: &Params<'_>) -> Result<DataFrame> {
    let mut exprs = Vec::new();
    for name in columns {
        let dtype = df.column(name)?.dtype();
        if !is_numeric_dtype(dtype) {
            debug!(column = %name, %dtype, "skipping non-numeric column");
            continue;
        }
        let target = col(name.as_str());
        exprs.push(
            ((target.clone() - target.clone().mean()) / target.std(1)).alias(name.as_str()),
        );
    }
    with_exprs(df, exprs)
}
