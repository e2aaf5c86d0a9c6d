//! Property tests for column resolution.

use proptest::prelude::*;

use scrub_model::ColumnSelector;
use scrub_transform::resolve;

fn column_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z_]{1,6}[0-9]{0,2}", 0..8)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn named_resolution_is_subset_in_requested_order(
        available in column_set(),
        requested in prop::collection::vec("[a-z_]{1,6}[0-9]{0,2}", 1..6),
    ) {
        let resolved = resolve(&ColumnSelector::columns(requested.clone()), &available);
        prop_assert!(resolved.iter().all(|c| available.contains(c)));
        let expected: Vec<String> = requested
            .into_iter()
            .filter(|c| available.contains(c))
            .collect();
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn pattern_resolution_keeps_dataset_order(available in column_set()) {
        let selector = ColumnSelector::pattern("[a-m]").unwrap();
        let resolved = resolve(&selector, &available);
        let expected: Vec<String> = available
            .iter()
            .filter(|c| c.starts_with(|ch: char| ('a'..='m').contains(&ch)))
            .cloned()
            .collect();
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn all_resolves_to_every_column(available in column_set()) {
        prop_assert_eq!(resolve(&ColumnSelector::All, &available), available);
    }
}
