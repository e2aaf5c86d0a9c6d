//! Column presence checks.

use polars::prelude::DataFrame;
use scrub_common::column_names;
use scrub_model::DataContract;

use crate::issue::ContractIssue;

/// Contract columns missing from `df`, then (strict contracts only) columns
/// of `df` the contract does not name, in dataset order.
pub fn check(df: &DataFrame, contract: &DataContract) -> Vec<ContractIssue> {
    let present = column_names(df);
    let mut issues: Vec<ContractIssue> = contract
        .columns
        .keys()
        .filter(|name| !present.contains(name))
        .map(|name| ContractIssue::MissingColumn {
            column: name.clone(),
        })
        .collect();

    if contract.strict {
        issues.extend(
            present
                .into_iter()
                .filter(|name| !contract.columns.contains_key(name))
                .map(|column| ContractIssue::UnexpectedColumn { column }),
        );
    }
    issues
}
