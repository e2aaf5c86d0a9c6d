//! Contract error types.

use std::fmt;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::issue::ContractIssue;

/// Which dataset a contract was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPhase {
    /// Dataset before any rule ran.
    Input,
    /// Dataset after every rule ran.
    Output,
    /// A standalone check outside the cleaning pipeline.
    Data,
}

impl ContractPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for ContractPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    /// The dataset broke its contract.
    #[error("{phase} contract violated: {}", summarize(.issues))]
    Violation {
        phase: ContractPhase,
        issues: Vec<ContractIssue>,
    },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl ContractError {
    /// Issues behind a violation; empty for other errors.
    pub fn issues(&self) -> &[ContractIssue] {
        match self {
            Self::Violation { issues, .. } => issues,
            Self::DataFrame { .. } => &[],
        }
    }

    pub fn phase(&self) -> Option<ContractPhase> {
        match self {
            Self::Violation { phase, .. } => Some(*phase),
            Self::DataFrame { .. } => None,
        }
    }
}

impl From<PolarsError> for ContractError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

fn summarize(issues: &[ContractIssue]) -> String {
    match issues {
        [] => "no issues recorded".to_string(),
        [only] => only.message(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message(), rest.len()),
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
