//! Engine error types.

use polars::prelude::PolarsError;
use scrub_model::ConfigError;
use scrub_store::StoreError;
use scrub_transform::TransformError;
use scrub_validate::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// `clean` or a config-dependent helper ran before a configuration was loaded.
    #[error("configuration not loaded; call load_config() first")]
    NotConfigured,

    #[error("no store configured for storage operations")]
    StoreMissing,

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A rule's operation failed; no partial result is returned.
    #[error("rule '{rule}' failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: TransformError,
    },

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl EngineError {
    /// True when a rule named an operation the registry cannot dispatch.
    pub fn is_unknown_operation(&self) -> bool {
        matches!(
            self,
            Self::Rule {
                source: TransformError::UnknownOperation { .. },
                ..
            }
        )
    }
}

impl From<PolarsError> for EngineError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
