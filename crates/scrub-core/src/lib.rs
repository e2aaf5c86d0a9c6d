//! Rule pipeline executor for scrub.
//!
//! [`CleaningEngine`] applies a [`scrub_model::RuleConfig`] to a frame:
//! input contract, then each enabled rule in order, then output contract.

pub mod engine;
pub mod error;
pub mod observability;
pub mod report;

pub use engine::{CleanOptions, CleaningEngine};
pub use error::{EngineError, Result};
pub use observability::Tracer;
pub use report::{CleanReport, FrameShape, RuleOutcome, RuleStatus};
