//! Rule model for the scrub cleaning engine.
//!
//! - **selector**: which columns a rule targets
//! - **operation**: the closed catalog of operation identifiers
//! - **rule**: one ordered, optionally disabled cleaning step
//! - **contract**: schema expectations checked around a cleaning run
//! - **config**: the full rule document and its TOML/JSON encodings
//!
//! Every type validates its invariants when it is built, whether from code
//! or from a parsed document.

pub mod config;
pub mod contract;
pub mod error;
pub mod operation;
pub mod rule;
pub mod selector;
pub mod value_type;

pub use config::{
    DEFAULT_SERVICE_NAME, DEFAULT_VERSION, DocumentFormat, ObservabilityConfig, RuleConfig,
};
pub use contract::{ColumnSpec, DataContract};
pub use error::{ConfigError, Result};
pub use operation::{CleaningOperation, UnknownOperation};
pub use rule::{CleaningRule, Parameters};
pub use selector::{AnchoredPattern, ColumnSelector};
pub use value_type::ValueType;
