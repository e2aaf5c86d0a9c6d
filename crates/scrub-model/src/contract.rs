//! Schema contracts checked before and after cleaning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::selector::AnchoredPattern;
use crate::value_type::ValueType;

/// Constraints for one contract column.
///
/// Range, pattern and membership checks ignore null values; nullability is
/// checked separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColumnSpecDocument", into = "ColumnSpecDocument")]
pub struct ColumnSpec {
    pub dtype: ValueType,
    pub nullable: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub regex: Option<AnchoredPattern>,
    pub isin: Option<Vec<Value>>,
}

impl ColumnSpec {
    pub fn new(dtype: ValueType) -> Self {
        Self {
            dtype,
            nullable: true,
            min: None,
            max: None,
            regex: None,
            isin: None,
        }
    }

    #[must_use]
    pub fn non_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_regex(mut self, pattern: &str) -> Result<Self> {
        let compiled = AnchoredPattern::new(pattern)
            .map_err(|e| ConfigError::invalid("regex", e.to_string()))?;
        self.regex = Some(compiled);
        Ok(self)
    }

    #[must_use]
    pub fn with_isin(mut self, values: Vec<Value>) -> Self {
        self.isin = Some(values);
        self
    }
}

/// Expected dataset schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractDocument", into = "ContractDocument")]
pub struct DataContract {
    /// Column name to constraints.
    pub columns: BTreeMap<String, ColumnSpec>,
    /// Reject columns that the contract does not name.
    pub strict: bool,
    /// Cast columns to their declared type before checking.
    pub coerce: bool,
}

impl Default for DataContract {
    fn default() -> Self {
        Self {
            columns: BTreeMap::new(),
            strict: true,
            coerce: false,
        }
    }
}

impl DataContract {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, spec: ColumnSpec) -> Self {
        self.columns.insert(name.into(), spec);
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnSpecDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<Vec<Value>>,
}

fn default_true() -> bool {
    true
}

impl TryFrom<ColumnSpecDocument> for ColumnSpec {
    type Error = ConfigError;

    fn try_from(doc: ColumnSpecDocument) -> Result<Self> {
        // Columns without a declared type are expected to hold strings.
        let dtype = match doc.dtype {
            Some(raw) => raw.parse::<ValueType>().map_err(|value| ConfigError::UnknownType {
                field: "dtype".to_string(),
                value,
            })?,
            None => ValueType::String,
        };
        let mut spec = Self::new(dtype)
            .with_nullable(doc.nullable)
            .with_range(doc.min, doc.max);
        if let Some(pattern) = doc.regex {
            spec = spec.with_regex(&pattern)?;
        }
        if let Some(values) = doc.isin {
            spec = spec.with_isin(values);
        }
        Ok(spec)
    }
}

impl From<ColumnSpec> for ColumnSpecDocument {
    fn from(spec: ColumnSpec) -> Self {
        Self {
            dtype: Some(spec.dtype.as_str().to_string()),
            nullable: spec.nullable,
            min: spec.min,
            max: spec.max,
            regex: spec.regex.map(|pattern| pattern.as_str().to_string()),
            isin: spec.isin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ContractDocument {
    #[serde(default = "default_true")]
    pub strict: bool,
    #[serde(default)]
    pub coerce: bool,
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnSpecDocument>,
}

impl TryFrom<ContractDocument> for DataContract {
    type Error = ConfigError;

    fn try_from(doc: ContractDocument) -> Result<Self> {
        let mut columns = BTreeMap::new();
        for (name, spec) in doc.columns {
            let spec = ColumnSpec::try_from(spec).map_err(|e| e.at(&format!("columns.{name}")))?;
            columns.insert(name, spec);
        }
        Ok(Self {
            columns,
            strict: doc.strict,
            coerce: doc.coerce,
        })
    }
}

impl From<DataContract> for ContractDocument {
    fn from(contract: DataContract) -> Self {
        Self {
            strict: contract.strict,
            coerce: contract.coerce,
            columns: contract
                .columns
                .into_iter()
                .map(|(name, spec)| (name, spec.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_defaults_are_strict_without_coercion() {
        let contract = DataContract::new();
        assert!(contract.strict);
        assert!(!contract.coerce);
    }

    #[test]
    fn spec_document_defaults_to_nullable_string() {
        let doc: ColumnSpecDocument = serde_json::from_str("{}").unwrap();
        let spec = ColumnSpec::try_from(doc).unwrap();
        assert_eq!(spec.dtype, ValueType::String);
        assert!(spec.nullable);
    }

    #[test]
    fn unknown_dtype_names_field() {
        let json = r#"{"columns": {"age": {"dtype": "decimal"}}}"#;
        let doc: ContractDocument = serde_json::from_str(json).unwrap();
        let err = DataContract::try_from(doc).unwrap_err();
        assert_eq!(err.field(), Some("columns.age.dtype"));
    }

    #[test]
    fn invalid_regex_names_field() {
        let json = r#"{"columns": {"email": {"regex": "[a-"}}}"#;
        let doc: ContractDocument = serde_json::from_str(json).unwrap();
        let err = DataContract::try_from(doc).unwrap_err();
        assert_eq!(err.field(), Some("columns.email.regex"));
    }
}
