//! The closed catalog of cleaning operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operation identifier carried by a [`crate::CleaningRule`].
///
/// The document form is snake_case (`drop_nulls`); kebab-case
/// (`drop-nulls`) is accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningOperation {
    DropNulls,
    FillNulls,
    DropDuplicates,
    TrimWhitespace,
    Lowercase,
    Uppercase,
    Replace,
    CastType,
    Filter,
    RemoveOutliers,
    Standardize,
    /// Reserved for contract checks; carries no transformation of its own.
    Validate,
}

impl CleaningOperation {
    pub const ALL: [Self; 12] = [
        Self::DropNulls,
        Self::FillNulls,
        Self::DropDuplicates,
        Self::TrimWhitespace,
        Self::Lowercase,
        Self::Uppercase,
        Self::Replace,
        Self::CastType,
        Self::Filter,
        Self::RemoveOutliers,
        Self::Standardize,
        Self::Validate,
    ];

    /// Identifier used in rule documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DropNulls => "drop_nulls",
            Self::FillNulls => "fill_nulls",
            Self::DropDuplicates => "drop_duplicates",
            Self::TrimWhitespace => "trim_whitespace",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Replace => "replace",
            Self::CastType => "cast_type",
            Self::Filter => "filter",
            Self::RemoveOutliers => "remove_outliers",
            Self::Standardize => "standardize",
            Self::Validate => "validate",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::DropNulls => "Drop rows with a null in any selected column",
            Self::FillNulls => "Fill nulls with a value or a per-column strategy",
            Self::DropDuplicates => "Drop repeated rows, keeping the first occurrence",
            Self::TrimWhitespace => "Strip leading and trailing whitespace from strings",
            Self::Lowercase => "Convert strings to lowercase",
            Self::Uppercase => "Convert strings to uppercase",
            Self::Replace => "Replace an exact value or a regex match",
            Self::CastType => "Cast columns to a canonical type",
            Self::Filter => "Keep rows where the first selected column satisfies a comparison",
            Self::RemoveOutliers => "Drop rows outside IQR or z-score bounds",
            Self::Standardize => "Rescale numeric columns to zero mean and unit deviation",
            Self::Validate => "Reserved for contract validation",
        }
    }

    /// Parameter names the operation reads.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::FillNulls => &["strategy", "value"],
            Self::DropDuplicates => &["maintain_order"],
            Self::Replace => &["pattern", "value", "replacement"],
            Self::CastType => &["dtype", "strict"],
            Self::Filter => &["operator", "value"],
            Self::RemoveOutliers => &["method", "threshold"],
            Self::DropNulls
            | Self::TrimWhitespace
            | Self::Lowercase
            | Self::Uppercase
            | Self::Standardize
            | Self::Validate => &[],
        }
    }
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an identifier is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for CleaningOperation {
    type Err = UnknownOperation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| UnknownOperation(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_and_kebab_case() {
        assert_eq!(
            "drop_nulls".parse::<CleaningOperation>(),
            Ok(CleaningOperation::DropNulls)
        );
        assert_eq!(
            "remove-outliers".parse::<CleaningOperation>(),
            Ok(CleaningOperation::RemoveOutliers)
        );
        assert_eq!(
            "Cast_Type".parse::<CleaningOperation>(),
            Ok(CleaningOperation::CastType)
        );
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = "explode".parse::<CleaningOperation>().unwrap_err();
        assert_eq!(err.to_string(), "unknown operation 'explode'");
    }

    #[test]
    fn identifiers_round_trip() {
        for op in CleaningOperation::ALL {
            assert_eq!(op.as_str().parse::<CleaningOperation>(), Ok(op));
        }
    }
}
