//! Contract issue types.
//!
//! Each variant carries only the data its message needs.

use std::fmt;

use scrub_model::ValueType;
use serde::Serialize;

/// Maximum number of offending values kept per issue.
pub const MAX_SAMPLES: usize = 5;

/// One contract violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractIssue {
    /// Contract column absent from the dataset.
    MissingColumn { column: String },
    /// Dataset column the contract does not name (strict contracts only).
    UnexpectedColumn { column: String },
    /// Column type differs from the declared one.
    TypeMismatch {
        column: String,
        expected: ValueType,
        found: String,
    },
    /// Non-nullable column holding nulls.
    NullValues { column: String, null_count: u64 },
    /// Values below the declared minimum.
    BelowMinimum {
        column: String,
        min: f64,
        count: u64,
        samples: Vec<String>,
    },
    /// Values above the declared maximum.
    AboveMaximum {
        column: String,
        max: f64,
        count: u64,
        samples: Vec<String>,
    },
    /// Strings not matching the declared pattern.
    PatternMismatch {
        column: String,
        pattern: String,
        count: u64,
        samples: Vec<String>,
    },
    /// Values outside the allowed set.
    NotInSet {
        column: String,
        count: u64,
        samples: Vec<String>,
    },
    /// Values that could not be coerced to the declared type.
    CoercionFailed {
        column: String,
        expected: ValueType,
        count: u64,
        samples: Vec<String>,
    },
}

impl ContractIssue {
    /// Column the issue concerns.
    pub fn column(&self) -> &str {
        match self {
            Self::MissingColumn { column }
            | Self::UnexpectedColumn { column }
            | Self::TypeMismatch { column, .. }
            | Self::NullValues { column, .. }
            | Self::BelowMinimum { column, .. }
            | Self::AboveMaximum { column, .. }
            | Self::PatternMismatch { column, .. }
            | Self::NotInSet { column, .. }
            | Self::CoercionFailed { column, .. } => column,
        }
    }

    /// Number of offending values, for value-level issues.
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::MissingColumn { .. }
            | Self::UnexpectedColumn { .. }
            | Self::TypeMismatch { .. } => None,
            Self::NullValues { null_count, .. } => Some(*null_count),
            Self::BelowMinimum { count, .. }
            | Self::AboveMaximum { count, .. }
            | Self::PatternMismatch { count, .. }
            | Self::NotInSet { count, .. }
            | Self::CoercionFailed { count, .. } => Some(*count),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingColumn { column } => format!("column '{column}' is missing"),
            Self::UnexpectedColumn { column } => {
                format!("column '{column}' is not allowed by a strict contract")
            }
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => format!("column '{column}' has type {found}, expected {expected}"),
            Self::NullValues { column, null_count } => {
                format!("column '{column}' has {null_count} null values")
            }
            Self::BelowMinimum {
                column,
                min,
                count,
                samples,
            } => format!(
                "column '{column}' has {count} values below {min}{}",
                sample_suffix(samples)
            ),
            Self::AboveMaximum {
                column,
                max,
                count,
                samples,
            } => format!(
                "column '{column}' has {count} values above {max}{}",
                sample_suffix(samples)
            ),
            Self::PatternMismatch {
                column,
                pattern,
                count,
                samples,
            } => format!(
                "column '{column}' has {count} values not matching '{pattern}'{}",
                sample_suffix(samples)
            ),
            Self::NotInSet {
                column,
                count,
                samples,
            } => format!(
                "column '{column}' has {count} values outside the allowed set{}",
                sample_suffix(samples)
            ),
            Self::CoercionFailed {
                column,
                expected,
                count,
                samples,
            } => format!(
                "column '{column}' has {count} values that cannot be read as {expected}{}",
                sample_suffix(samples)
            ),
        }
    }
}

impl fmt::Display for ContractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

fn sample_suffix(samples: &[String]) -> String {
    if samples.is_empty() {
        String::new()
    } else {
        format!(" (e.g., {})", samples.join(", "))
    }
}
