//! Contract check modules.
//!
//! Each module inspects one aspect of a column against its [`ColumnSpec`].

mod dtype;
mod nulls;
mod presence;
mod values;

use polars::prelude::{AnyValue, DataFrame};
use scrub_common::any_to_string;
use scrub_model::{ColumnSpec, DataContract};

use crate::issue::{ContractIssue, MAX_SAMPLES};

/// Run every check of `contract` against `df`.
pub fn run_all(df: &DataFrame, contract: &DataContract) -> Vec<ContractIssue> {
    let mut issues = presence::check(df, contract);

    for (name, spec) in &contract.columns {
        let Ok(column) = df.column(name) else {
            continue;
        };
        issues.extend(nulls::check(name, column, spec));

        // Value checks on a column of the wrong type only repeat the mismatch.
        if let Some(issue) = dtype::check(name, column, spec) {
            issues.push(issue);
            continue;
        }
        issues.extend(values::check(name, column, spec));
    }

    issues
}

/// Offending values gathered while scanning a column.
#[derive(Debug, Default)]
pub(crate) struct Offenders {
    pub count: u64,
    pub samples: Vec<String>,
}

impl Offenders {
    pub fn record(&mut self, value: AnyValue<'_>) {
        self.count += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(any_to_string(value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

pub(crate) fn declared(spec: &ColumnSpec) -> bool {
    spec.min.is_some() || spec.max.is_some() || spec.regex.is_some() || spec.isin.is_some()
}
