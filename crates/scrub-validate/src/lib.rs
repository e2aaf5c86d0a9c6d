//! Data contract checks for scrub datasets.
//!
//! [`validate`] checks a frame against a [`DataContract`] and fails with every
//! issue found; [`infer_contract`] describes a sample frame as a contract.

pub mod checks;
pub mod coerce;
pub mod error;
pub mod infer;
pub mod issue;

use polars::prelude::DataFrame;
use scrub_model::DataContract;
use tracing::debug;

pub use coerce::coerce;
pub use error::{ContractError, ContractPhase, Result};
pub use infer::infer_contract;
pub use issue::ContractIssue;

/// Check `df` against `contract` without failing.
///
/// Returns the frame the checks ran on (coerced when the contract asks for
/// it) together with every issue found.
pub fn check(df: &DataFrame, contract: &DataContract) -> Result<(DataFrame, Vec<ContractIssue>)> {
    let (checked, mut issues) = if contract.coerce {
        coerce(df, contract)?
    } else {
        (df.clone(), Vec::new())
    };
    issues.extend(checks::run_all(&checked, contract));
    Ok((checked, issues))
}

/// Validate `df` against `contract`.
///
/// Returns the validated frame, coerced when the contract asks for it. Any
/// issue fails the call with [`ContractError::Violation`] carrying `phase`.
pub fn validate(
    df: &DataFrame,
    contract: &DataContract,
    phase: ContractPhase,
) -> Result<DataFrame> {
    let (checked, issues) = check(df, contract)?;
    if issues.is_empty() {
        debug!(%phase, columns = contract.columns.len(), "contract satisfied");
        return Ok(checked);
    }
    debug!(%phase, issues = issues.len(), "contract violated");
    Err(ContractError::Violation { phase, issues })
}
