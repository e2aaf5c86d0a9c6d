//! Integration tests for the cleaning engine.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tempfile::TempDir;

use scrub_core::{CleanOptions, CleaningEngine, EngineError, RuleStatus};
use scrub_model::{
    CleaningOperation, CleaningRule, ColumnSelector, ColumnSpec, DataContract, RuleConfig,
    ValueType,
};
use scrub_store::{IfExists, SqliteStore};
use scrub_validate::{ContractError, ContractPhase};

const CUSTOMER_RULES: &str = r#"
version = "1.0"
name = "customer_cleaning"
description = "Normalise customer emails and ages"

[observability]
enabled = true
service_name = "customer-cleaner"

[[rules]]
name = "dedupe"
operation = "drop_duplicates"
order = 5

[[rules]]
name = "trim_email"
operation = "trim_whitespace"
order = 1
columns = { columns = ["email"] }

[[rules]]
name = "lower_email"
operation = "lowercase"
order = 2
columns = { columns = ["email"] }

[[rules]]
name = "fill_age"
operation = "fill_nulls"
order = 3
columns = { columns = ["age"] }
parameters = { strategy = "median" }

[[rules]]
name = "age_outliers"
operation = "remove-outliers"
order = 4
columns = { columns = ["age"] }
parameters = { method = "iqr", threshold = 1.5 }
"#;

fn customers() -> DataFrame {
    let columns: Vec<Column> = vec![
        Series::new("id".into(), &[1i64, 2, 3, 4, 5, 5]).into_column(),
        Series::new(
            "email".into(),
            &[
                Some("  A@T.COM  "),
                Some("b@t.com"),
                None,
                Some("C@T.COM"),
                Some("d@t.com"),
                Some("d@t.com"),
            ],
        )
        .into_column(),
        Series::new(
            "age".into(),
            &[Some(25i64), Some(30), None, Some(150), Some(28), Some(28)],
        )
        .into_column(),
    ];
    DataFrame::new(columns).unwrap()
}

fn customer_engine() -> CleaningEngine {
    CleaningEngine::new().with_config(RuleConfig::from_toml_str(CUSTOMER_RULES).unwrap())
}

fn emails(df: &DataFrame) -> Vec<Option<String>> {
    df.column("email")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(String::from))
        .collect()
}

#[test]
fn end_to_end_customer_cleaning() {
    let input = customers();
    let output = customer_engine()
        .clean(&input, CleanOptions::default())
        .unwrap();

    assert_eq!(output.height(), 4);
    assert_eq!(
        emails(&output),
        vec![
            Some("a@t.com".to_string()),
            Some("b@t.com".to_string()),
            None,
            Some("d@t.com".to_string()),
        ]
    );
    let age = output.column("age").unwrap();
    assert_eq!(age.null_count(), 0);
    let ages: Vec<Option<f64>> = age
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ages, vec![Some(25.0), Some(30.0), Some(28.0), Some(28.0)]);

    // The caller's frame is untouched.
    assert!(input.equals_missing(&customers()));
}

#[test]
fn report_tracks_each_rule() {
    let (_, report) = customer_engine()
        .clean_with_report(&customers(), CleanOptions::default())
        .unwrap();
    let names: Vec<&str> = report.rules.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(
        names,
        vec!["trim_email", "lower_email", "fill_age", "age_outliers", "dedupe"]
    );
    assert_eq!(report.applied(), 5);
    assert_eq!(report.rows_removed(), 2);
    assert_eq!(report.rules[3].rows_before, 6);
    assert_eq!(report.rules[3].rows_after, 5);
    assert_eq!(report.rules[4].columns, vec!["id", "email", "age"]);
}

#[test]
fn clean_requires_configuration() {
    let engine = CleaningEngine::new();
    let err = engine
        .clean(&customers(), CleanOptions::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::NotConfigured));
}

#[test]
fn disabled_rule_equals_removed_rule() {
    let base = RuleConfig::from_toml_str(CUSTOMER_RULES).unwrap();
    let mut with_disabled = Vec::new();
    let mut without = Vec::new();
    for rule in base.rules() {
        if rule.name() == "lower_email" {
            with_disabled.push(rule.clone().disabled());
        } else {
            with_disabled.push(rule.clone());
            without.push(rule.clone());
        }
    }
    let disabled_engine =
        CleaningEngine::new().with_config(RuleConfig::new("disabled", with_disabled).unwrap());
    let removed_engine =
        CleaningEngine::new().with_config(RuleConfig::new("removed", without).unwrap());

    let (a, report) = disabled_engine
        .clean_with_report(&customers(), CleanOptions::default())
        .unwrap();
    let b = removed_engine
        .clean(&customers(), CleanOptions::default())
        .unwrap();
    assert!(a.equals_missing(&b));
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.rules[1].status, RuleStatus::Skipped);
}

#[test]
fn unknown_operation_fails_without_partial_result() {
    let rules = vec![
        CleaningRule::new("trim", CleaningOperation::TrimWhitespace)
            .unwrap()
            .with_order(0),
        CleaningRule::new("check", CleaningOperation::Validate)
            .unwrap()
            .with_order(1),
    ];
    let engine = CleaningEngine::new().with_config(RuleConfig::new("cfg", rules).unwrap());
    let input = customers();
    let err = engine.clean(&input, CleanOptions::default()).unwrap_err();
    assert!(err.is_unknown_operation());
    insta::assert_snapshot!(err.to_string(), @"rule 'check' failed: unknown operation 'validate'");
    assert!(input.equals_missing(&customers()));
}

#[test]
fn later_rules_see_earlier_schema_changes() {
    let df = DataFrame::new(vec![
        Series::new("code".into(), &[1i64, 2]).into_column(),
        Series::new("label".into(), &["x1", "y"]).into_column(),
    ])
    .unwrap();
    let rules = vec![
        CleaningRule::new("stringify", CleaningOperation::CastType)
            .unwrap()
            .with_columns(ColumnSelector::columns(["code"]))
            .with_parameter("dtype", "string"),
        CleaningRule::new("spell_one", CleaningOperation::Replace)
            .unwrap()
            .with_parameter("pattern", "1")
            .with_parameter("replacement", "one")
            .with_order(1),
    ];
    let engine = CleaningEngine::new().with_config(RuleConfig::new("cfg", rules).unwrap());
    let out = engine.clean(&df, CleanOptions::default()).unwrap();
    let codes: Vec<Option<&str>> = out.column("code").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(codes, vec![Some("one"), Some("2")]);
    let labels: Vec<Option<&str>> = out
        .column("label")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(labels, vec![Some("xone"), Some("y")]);
}

#[test]
fn input_contract_violation_stops_the_run() {
    let contract = DataContract::new()
        .with_column("id", ColumnSpec::new(ValueType::Integer))
        .with_column("email", ColumnSpec::new(ValueType::String).non_nullable())
        .with_column("age", ColumnSpec::new(ValueType::Integer));
    let config = RuleConfig::from_toml_str(CUSTOMER_RULES)
        .unwrap()
        .with_input_contract(contract);
    let engine = CleaningEngine::new().with_config(config);

    let err = engine
        .clean(&customers(), CleanOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Contract(ContractError::Violation {
            phase: ContractPhase::Input,
            ..
        })
    ));

    let skipped = CleanOptions {
        validate_input: false,
        ..CleanOptions::default()
    };
    assert!(engine.clean(&customers(), skipped).is_ok());
}

#[test]
fn output_contract_is_checked_after_rules() {
    let contract = DataContract::new()
        .with_column("id", ColumnSpec::new(ValueType::Integer))
        .with_column("email", ColumnSpec::new(ValueType::String))
        .with_column(
            "age",
            ColumnSpec::new(ValueType::Float)
                .non_nullable()
                .with_range(Some(0.0), Some(120.0)),
        );
    let config = RuleConfig::from_toml_str(CUSTOMER_RULES)
        .unwrap()
        .with_output_contract(contract);
    let engine = CleaningEngine::new().with_config(config);
    let (_, report) = engine
        .clean_with_report(&customers(), CleanOptions::default())
        .unwrap();
    assert!(report.output_validated);
    assert!(!report.input_validated);

    // Without the outlier rule the 150-year-old breaks the range.
    let strict = CleaningEngine::new().with_config(
        RuleConfig::new(
            "no_outliers",
            engine
                .config()
                .unwrap()
                .rules()
                .iter()
                .filter(|rule| rule.name() != "age_outliers")
                .cloned()
                .collect(),
        )
        .unwrap()
        .with_output_contract(engine.config().unwrap().output_contract().unwrap().clone()),
    );
    let err = strict
        .clean(&customers(), CleanOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Contract(ContractError::Violation {
            phase: ContractPhase::Output,
            ..
        })
    ));
    assert!(strict.clean(&customers(), CleanOptions::unvalidated()).is_ok());
}

#[test]
fn clean_from_storage_round_trip() {
    let mut store = SqliteStore::in_memory();
    store.connect().unwrap();
    store
        .save_table(&customers(), "raw_customers", IfExists::Replace)
        .unwrap();

    let mut engine = customer_engine().with_store(store);
    let cleaned = engine
        .clean_from_storage("raw_customers", Some("clean_customers"))
        .unwrap();
    assert_eq!(cleaned.height(), 4);

    let store = engine.store().unwrap();
    assert_eq!(
        store.list_tables().unwrap(),
        vec!["clean_customers", "raw_customers"]
    );
    assert_eq!(store.load_table("clean_customers", None).unwrap().height(), 4);
}

#[test]
fn clean_from_storage_needs_a_store() {
    let mut engine = customer_engine();
    let err = engine.clean_from_storage("raw", None).unwrap_err();
    assert!(matches!(err, EngineError::StoreMissing));
}

#[test]
fn inferred_contracts_fill_gaps_only() {
    let existing = DataContract::new()
        .with_strict(false)
        .with_column("id", ColumnSpec::new(ValueType::Integer));
    let config = RuleConfig::from_toml_str(CUSTOMER_RULES)
        .unwrap()
        .with_input_contract(existing.clone());
    let mut engine = CleaningEngine::new().with_config(config);
    engine.infer_contracts(&customers()).unwrap();

    let config = engine.config().unwrap();
    assert_eq!(config.input_contract(), Some(&existing));
    let output = config.output_contract().unwrap();
    assert_eq!(output.columns.len(), 3);
    assert!(output.columns["email"].nullable);

    let mut unconfigured = CleaningEngine::new();
    assert!(matches!(
        unconfigured.infer_contracts(&customers()),
        Err(EngineError::NotConfigured)
    ));
}

#[test]
fn save_and_reload_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    let engine = customer_engine();
    engine.save_config(&path).unwrap();

    let mut reloaded = CleaningEngine::new();
    reloaded.load_config_file(&path).unwrap();
    assert_eq!(reloaded.config(), engine.config());
}

#[test]
fn tracing_flag_disables_tracer() {
    let engine = customer_engine();
    assert!(engine.tracer().is_enabled());
    assert_eq!(engine.tracer().service_name(), "customer-cleaner");
    let quiet = customer_engine().with_tracing(false);
    assert!(!quiet.tracer().is_enabled());
    assert!(quiet.clean(&customers(), CleanOptions::default()).is_ok());
}
