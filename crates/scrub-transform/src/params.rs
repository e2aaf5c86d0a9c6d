//! Typed access to free-form operation parameters.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{DataType, Expr, lit};
use scrub_common::{is_numeric_dtype, is_string_dtype};
use scrub_model::{CleaningOperation, Parameters};
use serde_json::Value;

use crate::error::{Result, TransformError};

/// Parameters of one rule, read on behalf of one operation.
///
/// A key holding JSON `null` reads as absent.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    operation: CleaningOperation,
    values: &'a Parameters,
}

impl<'a> Params<'a> {
    pub fn new(operation: CleaningOperation, values: &'a Parameters) -> Self {
        Self { operation, values }
    }

    pub fn operation(&self) -> CleaningOperation {
        self.operation
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    /// True when `key` is present and explicitly set to JSON `null`.
    pub fn is_null(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(Value::is_null)
    }

    pub fn str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {other}"))),
        }
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(self.invalid(key, format!("expected a number, got {other}"))),
        }
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, got {other}"))),
        }
    }

    pub fn invalid(&self, key: &str, message: impl Into<String>) -> TransformError {
        TransformError::InvalidParameter {
            operation: self.operation,
            parameter: key.to_string(),
            message: message.into(),
        }
    }
}

/// Convert a scalar JSON value into a literal expression.
pub(crate) fn literal(value: &Value) -> Option<Expr> {
    match value {
        Value::Bool(b) => Some(lit(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(lit(i)),
            None => n.as_f64().map(lit),
        },
        Value::String(s) => Some(lit(s.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// True when a scalar JSON value can be compared with or stored in a column of `dtype`.
pub(crate) fn literal_fits(dtype: &DataType, value: &Value) -> bool {
    match value {
        Value::String(_) => is_string_dtype(dtype),
        Value::Number(_) => is_numeric_dtype(dtype),
        Value::Bool(_) => matches!(dtype, DataType::Boolean),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// A literal comparable with a column of `dtype`, or `None` when the value does not fit.
///
/// Strings compared with date or datetime columns are parsed as ISO dates
/// (`2024-01-31`) or timestamps (`2024-01-31T08:00:00`, optional fraction)
/// and cast to the column type.
pub(crate) fn comparable(dtype: &DataType, value: &Value) -> Option<Expr> {
    match (dtype, value) {
        (DataType::Date | DataType::Datetime(..), Value::String(s)) => {
            parse_timestamp(s).map(|ts| lit(ts).cast(dtype.clone()))
        }
        _ if literal_fits(dtype, value) => literal(value),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
