//! A single cleaning step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::operation::CleaningOperation;
use crate::selector::{ColumnSelector, SelectorDocument};

/// Operation-specific parameters. Keys and value shapes are defined by each operation.
pub type Parameters = serde_json::Map<String, Value>;

/// One configured application of an operation to a column selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleDocument", into = "RuleDocument")]
pub struct CleaningRule {
    name: String,
    operation: CleaningOperation,
    columns: ColumnSelector,
    parameters: Parameters,
    enabled: bool,
    order: i64,
}

impl CleaningRule {
    /// Create an enabled rule over all columns with order 0.
    pub fn new(name: impl Into<String>, operation: CleaningOperation) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "rule name must not be empty"));
        }
        Ok(Self {
            name,
            operation,
            columns: ColumnSelector::All,
            parameters: Parameters::new(),
            enabled: true,
            order: 0,
        })
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnSelector) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn disabled(self) -> Self {
        self.with_enabled(false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> CleaningOperation {
        self.operation
    }

    pub fn columns(&self) -> &ColumnSelector {
        &self.columns
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn order(&self) -> i64 {
        self.order
    }
}

/// Serialized shape of a [`CleaningRule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RuleDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<SelectorDocument>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub parameters: Parameters,
}

fn default_enabled() -> bool {
    true
}

impl TryFrom<RuleDocument> for CleaningRule {
    type Error = ConfigError;

    fn try_from(doc: RuleDocument) -> Result<Self> {
        let name = doc.name.ok_or_else(|| ConfigError::missing("name"))?;
        let raw_operation = doc
            .operation
            .ok_or_else(|| ConfigError::missing("operation"))?;
        let operation = raw_operation
            .parse::<CleaningOperation>()
            .map_err(|_| ConfigError::UnknownOperation {
                field: "operation".to_string(),
                value: raw_operation.clone(),
            })?;
        // An omitted selector targets every column.
        let columns = match doc.columns {
            Some(selector) => {
                ColumnSelector::try_from(selector).map_err(|e| e.at("columns"))?
            }
            None => ColumnSelector::All,
        };
        Ok(Self::new(name, operation)?
            .with_columns(columns)
            .with_parameters(doc.parameters)
            .with_enabled(doc.enabled)
            .with_order(doc.order))
    }
}

impl From<CleaningRule> for RuleDocument {
    fn from(rule: CleaningRule) -> Self {
        Self {
            name: Some(rule.name),
            operation: Some(rule.operation.as_str().to_string()),
            enabled: rule.enabled,
            order: rule.order,
            columns: Some(rule.columns.into()),
            parameters: rule.parameters,
        }
    }
}
