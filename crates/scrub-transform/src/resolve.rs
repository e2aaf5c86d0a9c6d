//! Turning a column selector into the concrete columns of a dataset.

use polars::prelude::DataFrame;
use scrub_common::column_names;
use scrub_model::ColumnSelector;

/// Resolve `selector` against the columns a dataset currently has.
///
/// - all (or unspecified): every available column, in dataset order
/// - names: the requested names present in the dataset, in requested order;
///   absent names are dropped silently and an empty list means all columns
/// - pattern: available columns whose name matches from its first character,
///   in dataset order
pub fn resolve(selector: &ColumnSelector, available: &[String]) -> Vec<String> {
    match selector {
        ColumnSelector::Unspecified | ColumnSelector::All => available.to_vec(),
        ColumnSelector::Columns(names) if names.is_empty() => available.to_vec(),
        ColumnSelector::Columns(names) => names
            .iter()
            .filter(|name| available.contains(name))
            .cloned()
            .collect(),
        ColumnSelector::Pattern(pattern) => available
            .iter()
            .filter(|name| pattern.is_match(name))
            .cloned()
            .collect(),
    }
}

/// Resolve `selector` against the columns of `df`.
pub fn resolve_columns(selector: &ColumnSelector, df: &DataFrame) -> Vec<String> {
    resolve(selector, &column_names(df))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<String> {
        ["id", "col_1", "xcol_1", "col_22", "name"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn all_returns_dataset_order() {
        assert_eq!(resolve(&ColumnSelector::All, &available()), available());
        assert_eq!(resolve(&ColumnSelector::Unspecified, &available()), available());
    }

    #[test]
    fn names_keep_requested_order_and_drop_missing() {
        let selector = ColumnSelector::columns(["name", "missing", "id"]);
        assert_eq!(resolve(&selector, &available()), vec!["name", "id"]);
    }

    #[test]
    fn pattern_is_prefix_anchored() {
        let selector = ColumnSelector::pattern(r"col_\d+").unwrap();
        assert_eq!(resolve(&selector, &available()), vec!["col_1", "col_22"]);
    }

    #[test]
    fn empty_name_list_resolves_to_all() {
        let selector = ColumnSelector::Columns(Vec::new());
        assert_eq!(resolve(&selector, &available()), available());
        let selector = ColumnSelector::from_parts(Some(Vec::new()), None, false).unwrap();
        assert_eq!(resolve(&selector, &available()), available());
    }

    #[test]
    fn names_absent_from_dataset_resolve_to_nothing() {
        let selector = ColumnSelector::columns(["missing"]);
        assert!(resolve(&selector, &available()).is_empty());
    }
}
