use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical column type names shared by `cast_type` and data contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Datetime,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    /// Accepts the canonical names plus the short aliases `int`, `float64`,
    /// `str`, `utf8` and `bool`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "int64" => Ok(Self::Integer),
            "float" | "float64" | "double" => Ok(Self::Float),
            "string" | "str" | "utf8" => Ok(Self::String),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "datetime" | "timestamp" => Ok(Self::Datetime),
            _ => Err(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_names() {
        assert_eq!("int".parse::<ValueType>(), Ok(ValueType::Integer));
        assert_eq!("str".parse::<ValueType>(), Ok(ValueType::String));
        assert_eq!("BOOL".parse::<ValueType>(), Ok(ValueType::Boolean));
        assert_eq!("datetime".parse::<ValueType>(), Ok(ValueType::Datetime));
        assert!("decimal".parse::<ValueType>().is_err());
    }
}
