use std::path::PathBuf;

use thiserror::Error;

/// Structural problem in a rule document or a programmatically built rule.
///
/// Field-level variants carry the dotted path of the offending field
/// (`rules[2].columns`, `input_contract.columns.age.dtype`).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid {}: {message}", field_label(.field))]
    InvalidField { field: String, message: String },

    #[error("unknown operation '{value}' in `{field}`")]
    UnknownOperation { field: String, value: String },

    #[error("unknown type '{value}' in `{field}`")]
    UnknownType { field: String, value: String },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to write TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("failed to process JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format for {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the offending field, when the error is about a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidField { field, .. }
            | Self::UnknownOperation { field, .. }
            | Self::UnknownType { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Nest the field path under `prefix` (`columns` becomes `rules[1].columns`).
    pub(crate) fn at(self, prefix: &str) -> Self {
        let nest = |field: String| {
            if field.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{field}")
            }
        };
        match self {
            Self::MissingField { field } => Self::MissingField { field: nest(field) },
            Self::InvalidField { field, message } => Self::InvalidField {
                field: nest(field),
                message,
            },
            Self::UnknownOperation { field, value } => Self::UnknownOperation {
                field: nest(field),
                value,
            },
            Self::UnknownType { field, value } => Self::UnknownType {
                field: nest(field),
                value,
            },
            other => other,
        }
    }
}

fn field_label(field: &str) -> String {
    if field.is_empty() {
        "column selector".to_string()
    } else {
        format!("`{field}`")
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_field_paths() {
        let err = ConfigError::invalid("columns", "bad").at("rules[1]");
        assert_eq!(err.field(), Some("rules[1].columns"));
        assert_eq!(err.to_string(), "invalid `rules[1].columns`: bad");
    }

    #[test]
    fn empty_field_takes_prefix() {
        let err = ConfigError::missing("").at("rules");
        assert_eq!(err.field(), Some("rules"));
    }
}
