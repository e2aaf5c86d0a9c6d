use polars::prelude::*;
use scrub_model::ValueType;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::params::Params;

/// Engine type for a canonical type name.
pub fn polars_dtype(value_type: ValueType) -> DataType {
    match value_type {
        ValueType::Integer => DataType::Int64,
        ValueType::Float => DataType::Float64,
        ValueType::String => DataType::String,
        ValueType::Boolean => DataType::Boolean,
        ValueType::Date => DataType::Date,
        ValueType::Datetime => DataType::Datetime(TimeUnit::Microseconds, None),
    }
}

/// Canonical type name for an engine type, if it has one.
pub fn value_type_of(dtype: &DataType) -> Option<ValueType> {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Some(ValueType::Integer),
        DataType::Float32 | DataType::Float64 => Some(ValueType::Float),
        DataType::String => Some(ValueType::String),
        DataType::Boolean => Some(ValueType::Boolean),
        DataType::Date => Some(ValueType::Date),
        DataType::Datetime(_, _) => Some(ValueType::Datetime),
        _ => None,
    }
}

/// Cast `columns` to the type named by `dtype`.
///
/// Non-strict casts (the default) turn unconvertible values into nulls;
/// `strict = true` fails instead. Without `dtype` the frame is unchanged.
pub fn cast_type(mut df: DataFrame, columns: &[String], params: &Params<'_>) -> Result<DataFrame> {
    let Some(raw) = params.str("dtype")? else {
        debug!("no dtype given; leaving data unchanged");
        return Ok(df);
    };
    let value_type = raw
        .parse::<ValueType>()
        .map_err(|value| params.invalid("dtype", format!("unknown type '{value}'")))?;
    let target = polars_dtype(value_type);
    let strict = params.bool("strict")?.unwrap_or(false);

    for name in columns {
        let column = df.column(name)?;
        let cast = if strict {
            column.strict_cast(&target)
        } else {
            column.cast(&target)
        }
        .map_err(|e| TransformError::Cast {
            column: name.clone(),
            dtype: value_type,
            message: e.to_string(),
        })?;
        df.with_column(cast)?;
    }
    Ok(df)
}
