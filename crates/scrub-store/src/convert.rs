//! Conversion between frame values and SQLite values.
//!
//! Dates and datetimes are stored as ISO-8601 text under `DATE` and
//! `TIMESTAMP` declared types; booleans as 0/1 under `BOOLEAN`.
//!
//! Datetimes are written as naive UTC wall time. The time zone and time unit
//! are not stored, so a reloaded `TIMESTAMP` column is always
//! `Datetime(Microseconds, None)` and sub-microsecond digits are truncated.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use polars::prelude::*;
use rusqlite::types::Value as SqlValue;
use scrub_common::any_to_string;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Storage class used to rebuild a frame column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    Integer,
    Real,
    Boolean,
    Text,
    Date,
    Timestamp,
}

impl SqlKind {
    pub fn for_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float32 | DataType::Float64 => Self::Real,
            DataType::Boolean => Self::Boolean,
            DataType::Date => Self::Date,
            DataType::Datetime(_, _) => Self::Timestamp,
            _ => Self::Text,
        }
    }

    pub fn declared_type(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Boolean => "BOOLEAN",
            Self::Text => "TEXT",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
        }
    }

    /// Interpret a declared column type. Empty or unknown declarations yield `None`.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let declared = declared.trim().to_ascii_uppercase();
        if declared.is_empty() {
            return None;
        }
        if declared.contains("TIMESTAMP") || declared.contains("DATETIME") {
            Some(Self::Timestamp)
        } else if declared == "DATE" {
            Some(Self::Date)
        } else if declared.contains("BOOL") {
            Some(Self::Boolean)
        } else if declared.contains("INT") {
            Some(Self::Integer)
        } else if declared.contains("REAL")
            || declared.contains("FLOA")
            || declared.contains("DOUB")
        {
            Some(Self::Real)
        } else if declared.contains("CHAR")
            || declared.contains("TEXT")
            || declared.contains("CLOB")
        {
            Some(Self::Text)
        } else {
            None
        }
    }

    /// Narrowest kind holding every non-null value.
    pub fn from_values(values: &[SqlValue]) -> Self {
        let mut kind: Option<Self> = None;
        for value in values {
            let next = match value {
                SqlValue::Null => continue,
                SqlValue::Integer(_) => Self::Integer,
                SqlValue::Real(_) => Self::Real,
                SqlValue::Text(_) | SqlValue::Blob(_) => return Self::Text,
            };
            kind = Some(match (kind, next) {
                (Some(Self::Real), _) | (_, Self::Real) => Self::Real,
                _ => next,
            });
        }
        kind.unwrap_or(Self::Text)
    }
}

fn epoch() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

/// Convert one frame cell to a SQLite value.
///
/// A datetime becomes its UTC instant as text, without its time zone.
pub fn to_sql(value: AnyValue<'_>) -> SqlValue {
    match value {
        AnyValue::Null => SqlValue::Null,
        AnyValue::Boolean(b) => SqlValue::Integer(i64::from(b)),
        AnyValue::Int8(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::Int16(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::Int32(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::Int64(v) => SqlValue::Integer(v),
        AnyValue::UInt8(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::UInt16(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::UInt32(v) => SqlValue::Integer(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => SqlValue::Integer(v),
            Err(_) => SqlValue::Real(v as f64),
        },
        AnyValue::Float32(v) => SqlValue::Real(f64::from(v)),
        AnyValue::Float64(v) => SqlValue::Real(v),
        AnyValue::Date(days) => epoch()
            .checked_add_signed(TimeDelta::days(i64::from(days)))
            .map_or(SqlValue::Null, |date| {
                SqlValue::Text(date.format("%Y-%m-%d").to_string())
            }),
        AnyValue::Datetime(ts, unit, _) => timestamp_to_naive(ts, unit)
            .map_or(SqlValue::Null, |dt| {
                SqlValue::Text(dt.format(DATETIME_FORMAT).to_string())
            }),
        other => SqlValue::Text(any_to_string(other)),
    }
}

fn timestamp_to_naive(ts: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(ts)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ts),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ts),
    };
    utc.map(|dt| dt.naive_utc())
}

/// Build a frame column from the values SQLite returned for it.
pub fn to_column(name: &str, kind: SqlKind, values: &[SqlValue]) -> PolarsResult<Column> {
    let name: PlSmallStr = name.into();
    let series = match kind {
        SqlKind::Integer => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Integer(v) => Some(*v),
                    SqlValue::Real(v) => Some(*v as i64),
                    SqlValue::Text(s) => s.trim().parse().ok(),
                    SqlValue::Null | SqlValue::Blob(_) => None,
                })
                .collect::<Vec<Option<i64>>>(),
        ),
        SqlKind::Real => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Integer(v) => Some(*v as f64),
                    SqlValue::Real(v) => Some(*v),
                    SqlValue::Text(s) => s.trim().parse().ok(),
                    SqlValue::Null | SqlValue::Blob(_) => None,
                })
                .collect::<Vec<Option<f64>>>(),
        ),
        SqlKind::Boolean => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Integer(v) => Some(*v != 0),
                    SqlValue::Text(s) => s.trim().parse().ok(),
                    SqlValue::Null | SqlValue::Real(_) | SqlValue::Blob(_) => None,
                })
                .collect::<Vec<Option<bool>>>(),
        ),
        SqlKind::Text => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Null => None,
                    SqlValue::Integer(v) => Some(v.to_string()),
                    SqlValue::Real(v) => Some(v.to_string()),
                    SqlValue::Text(s) => Some(s.clone()),
                    SqlValue::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                })
                .collect::<Vec<Option<String>>>(),
        ),
        SqlKind::Date => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                        .ok()
                        .and_then(|date| i32::try_from((date - epoch()).num_days()).ok()),
                    _ => None,
                })
                .collect::<Vec<Option<i32>>>(),
        )
        .cast(&DataType::Date)?,
        SqlKind::Timestamp => Series::new(
            name,
            values
                .iter()
                .map(|value| match value {
                    SqlValue::Text(s) => NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
                        .ok()
                        .map(|dt| dt.and_utc().timestamp_micros()),
                    _ => None,
                })
                .collect::<Vec<Option<i64>>>(),
        )
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
    };
    Ok(series.into_column())
}
