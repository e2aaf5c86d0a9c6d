//! Property tests for rule model invariants.

use proptest::prelude::*;
use scrub_model::{CleaningOperation, CleaningRule, ColumnSelector, RuleConfig};

fn names() -> impl Strategy<Value = Option<Vec<String>>> {
    proptest::option::of(proptest::collection::vec("[a-z]{1,6}", 0..4))
}

fn patterns() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z_]{0,5}")
}

proptest! {
    #[test]
    fn selector_accepts_at_most_one_mode(
        columns in names(),
        pattern in patterns(),
        all in any::<bool>(),
    ) {
        let modes = usize::from(columns.as_ref().is_some_and(|c| !c.is_empty()))
            + usize::from(pattern.as_ref().is_some_and(|p| !p.is_empty()))
            + usize::from(all);
        let result = ColumnSelector::from_parts(columns, pattern, all);
        prop_assert_eq!(result.is_ok(), modes <= 1);
    }

    #[test]
    fn rules_sorted_and_stable(orders in proptest::collection::vec(-3i64..4, 0..24)) {
        let rules: Vec<CleaningRule> = orders
            .iter()
            .enumerate()
            .map(|(idx, order)| {
                CleaningRule::new(format!("rule_{idx}"), CleaningOperation::Lowercase)
                    .unwrap()
                    .with_order(*order)
            })
            .collect();
        let config = RuleConfig::new("prop", rules).unwrap();

        let observed: Vec<(i64, usize)> = config
            .rules()
            .iter()
            .map(|rule| {
                let idx = rule.name().trim_start_matches("rule_").parse::<usize>().unwrap();
                (rule.order(), idx)
            })
            .collect();
        for pair in observed.windows(2) {
            prop_assert!(pair[0].0 <= pair[1].0);
            if pair[0].0 == pair[1].0 {
                prop_assert!(pair[0].1 < pair[1].1);
            }
        }
        prop_assert_eq!(observed.len(), orders.len());
    }
}
