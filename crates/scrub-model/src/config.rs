//! The full rule document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::{ContractDocument, DataContract};
use crate::error::{ConfigError, Result};
use crate::rule::{CleaningRule, RuleDocument};

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_SERVICE_NAME: &str = "cleaning-engine";

/// Tracing settings carried in the rule document.
///
/// Keys other than `enabled` and `service_name` are kept in `extra` so a
/// document survives load and save unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

/// A named, versioned set of cleaning rules with optional contracts.
///
/// Rules are kept sorted by `order`; rules sharing an order keep their
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigDocument", into = "ConfigDocument")]
pub struct RuleConfig {
    version: String,
    name: String,
    description: Option<String>,
    input_contract: Option<DataContract>,
    output_contract: Option<DataContract>,
    rules: Vec<CleaningRule>,
    observability: ObservabilityConfig,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>, rules: Vec<CleaningRule>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "configuration name must not be empty"));
        }
        let mut rules = rules;
        rules.sort_by_key(CleaningRule::order);
        Ok(Self {
            version: DEFAULT_VERSION.to_string(),
            name,
            description: None,
            input_contract: None,
            output_contract: None,
            rules,
            observability: ObservabilityConfig::default(),
        })
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_input_contract(mut self, contract: DataContract) -> Self {
        self.input_contract = Some(contract);
        self
    }

    #[must_use]
    pub fn with_output_contract(mut self, contract: DataContract) -> Self {
        self.output_contract = Some(contract);
        self
    }

    #[must_use]
    pub fn with_observability(mut self, observability: ObservabilityConfig) -> Self {
        self.observability = observability;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn input_contract(&self) -> Option<&DataContract> {
        self.input_contract.as_ref()
    }

    pub fn output_contract(&self) -> Option<&DataContract> {
        self.output_contract.as_ref()
    }

    /// Rules in execution order.
    pub fn rules(&self) -> &[CleaningRule] {
        &self.rules
    }

    /// Enabled rules in execution order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &CleaningRule> {
        self.rules.iter().filter(|rule| rule.is_enabled())
    }

    pub fn observability(&self) -> &ObservabilityConfig {
        &self.observability
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let doc: ConfigDocument = toml::from_str(text)?;
        Self::try_from(doc)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: ConfigDocument = serde_json::from_str(text)?;
        Self::try_from(doc)
    }

    /// Load a document, choosing the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = DocumentFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        match format {
            DocumentFormat::Toml => Self::from_toml_str(&text),
            DocumentFormat::Json => Self::from_json_str(&text),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&ConfigDocument::from(self.clone()))?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ConfigDocument::from(
            self.clone(),
        ))?)
    }

    /// Write the document, choosing the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = match DocumentFormat::from_path(path)? {
            DocumentFormat::Toml => self.to_toml_string()?,
            DocumentFormat::Json => self.to_json_string()?,
        };
        std::fs::write(path, text).map_err(|e| ConfigError::io(path, e))
    }
}

/// Supported rule document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Serialized shape of a [`RuleConfig`]. Scalar keys come before tables so
/// the TOML rendering stays flat at the top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_contract: Option<ContractDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_contract: Option<ContractDocument>,
    #[serde(default)]
    pub rules: Option<Vec<RuleDocument>>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl TryFrom<ConfigDocument> for RuleConfig {
    type Error = ConfigError;

    fn try_from(doc: ConfigDocument) -> Result<Self> {
        let name = doc.name.ok_or_else(|| ConfigError::missing("name"))?;
        let raw_rules = doc.rules.ok_or_else(|| ConfigError::missing("rules"))?;
        let mut rules = Vec::with_capacity(raw_rules.len());
        for (idx, raw) in raw_rules.into_iter().enumerate() {
            let rule = CleaningRule::try_from(raw).map_err(|e| e.at(&format!("rules[{idx}]")))?;
            rules.push(rule);
        }
        let input_contract = doc
            .input_contract
            .map(DataContract::try_from)
            .transpose()
            .map_err(|e| e.at("input_contract"))?;
        let output_contract = doc
            .output_contract
            .map(DataContract::try_from)
            .transpose()
            .map_err(|e| e.at("output_contract"))?;

        let mut config = Self::new(name, rules)?
            .with_version(doc.version)
            .with_observability(doc.observability);
        config.description = doc.description;
        config.input_contract = input_contract;
        config.output_contract = output_contract;
        Ok(config)
    }
}

impl From<RuleConfig> for ConfigDocument {
    fn from(config: RuleConfig) -> Self {
        Self {
            version: config.version,
            name: Some(config.name),
            description: config.description,
            observability: config.observability,
            input_contract: config.input_contract.map(Into::into),
            output_contract: config.output_contract.map(Into::into),
            rules: Some(config.rules.into_iter().map(Into::into).collect()),
        }
    }
}
