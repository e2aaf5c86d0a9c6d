use polars::prelude::*;
use scrub_common::column_names;

use crate::error::Result;
use crate::params::Params;

/// Drop repeated rows, keeping the first occurrence.
///
/// Rows are compared on `columns`, or on every column when the list is
/// empty. Nulls compare equal to each other. Surviving rows keep their
/// relative order; `maintain_order` is accepted for compatibility and has
/// no further effect.
pub fn drop_duplicates(
    df: DataFrame,
    columns: &[String],
    _params: &Params<'_>,
) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }
    let subset = if columns.is_empty() {
        column_names(&df)
    } else {
        columns.to_vec()
    };
    Ok(df.unique_stable(Some(&subset), UniqueKeepStrategy::First, None)?)
}
