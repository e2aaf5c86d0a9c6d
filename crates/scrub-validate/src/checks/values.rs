//! Value-level checks: range, pattern and membership.
//!
//! Nulls are skipped by every check here.

use polars::prelude::{AnyValue, Column};
use scrub_common::{any_to_f64, is_numeric_dtype, is_string_dtype};
use scrub_model::ColumnSpec;
use serde_json::Value;

use super::{Offenders, declared};
use crate::issue::ContractIssue;

pub fn check(name: &str, column: &Column, spec: &ColumnSpec) -> Vec<ContractIssue> {
    if !declared(spec) {
        return Vec::new();
    }
    let numeric = is_numeric_dtype(column.dtype());
    let textual = is_string_dtype(column.dtype());

    let mut below = Offenders::default();
    let mut above = Offenders::default();
    let mut unmatched = Offenders::default();
    let mut outside = Offenders::default();

    for idx in 0..column.len() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if value.is_null() {
            continue;
        }
        if numeric && let Some(number) = any_to_f64(value.clone()) {
            if spec.min.is_some_and(|min| number < min) {
                below.record(value.clone());
            }
            if spec.max.is_some_and(|max| number > max) {
                above.record(value.clone());
            }
        }
        if textual
            && let Some(pattern) = &spec.regex
            && let Some(text) = as_text(&value)
            && !pattern.is_match(text)
        {
            unmatched.record(value.clone());
        }
        if let Some(allowed) = &spec.isin
            && !allowed.iter().any(|candidate| matches_value(&value, candidate))
        {
            outside.record(value);
        }
    }

    let mut issues = Vec::new();
    if let (Some(min), false) = (spec.min, below.is_empty()) {
        issues.push(ContractIssue::BelowMinimum {
            column: name.to_string(),
            min,
            count: below.count,
            samples: below.samples,
        });
    }
    if let (Some(max), false) = (spec.max, above.is_empty()) {
        issues.push(ContractIssue::AboveMaximum {
            column: name.to_string(),
            max,
            count: above.count,
            samples: above.samples,
        });
    }
    if let (Some(pattern), false) = (&spec.regex, unmatched.is_empty()) {
        issues.push(ContractIssue::PatternMismatch {
            column: name.to_string(),
            pattern: pattern.as_str().to_string(),
            count: unmatched.count,
            samples: unmatched.samples,
        });
    }
    if !outside.is_empty() {
        issues.push(ContractIssue::NotInSet {
            column: name.to_string(),
            count: outside.count,
            samples: outside.samples,
        });
    }
    issues
}

/// Equality between a cell and an allowed value; numbers compare by value.
fn matches_value(value: &AnyValue<'_>, candidate: &Value) -> bool {
    match candidate {
        Value::Number(n) => any_to_f64(value.clone()).is_some_and(|v| Some(v) == n.as_f64()),
        Value::String(s) => as_text(value) == Some(s.as_str()),
        Value::Bool(b) => matches!(value, AnyValue::Boolean(v) if v == b),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn as_text<'v>(value: &'v AnyValue<'_>) -> Option<&'v str> {
    match value {
        AnyValue::String(s) => Some(s),
        AnyValue::StringOwned(s) => Some(s.as_str()),
        _ => None,
    }
}
