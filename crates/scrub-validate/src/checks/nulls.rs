use polars::prelude::Column;
use scrub_model::ColumnSpec;

use crate::issue::ContractIssue;

pub fn check(name: &str, column: &Column, spec: &ColumnSpec) -> Option<ContractIssue> {
    if spec.nullable {
        return None;
    }
    let null_count = column.null_count();
    (null_count > 0).then(|| ContractIssue::NullValues {
        column: name.to_string(),
        null_count: null_count as u64,
    })
}
