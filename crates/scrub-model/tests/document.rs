//! Tests for loading and saving rule documents.

use scrub_model::{
    CleaningOperation, CleaningRule, ColumnSelector, ColumnSpec, ConfigError, DataContract,
    RuleConfig, ValueType,
};
use serde_json::json;

const EMAIL_RULES: &str = r#"
version = "1.0"
name = "email_cleanup"
description = "Normalise contact emails"

[observability]
enabled = false
service_name = "emails"
console_export = false

[input_contract]
strict = false

[input_contract.columns.email]
dtype = "string"
nullable = true

[[rules]]
name = "lowercase"
operation = "lowercase"
order = 2
columns = { columns = ["email"] }

[[rules]]
name = "trim"
operation = "trim-whitespace"
order = 1
columns = { pattern = "email" }

[[rules]]
name = "fill_age"
operation = "fill_nulls"
order = 1
enabled = false
columns = { columns = ["age"] }
parameters = { strategy = "median" }
"#;

fn sample_config() -> RuleConfig {
    let contract = DataContract::new()
        .with_strict(false)
        .with_column("id", ColumnSpec::new(ValueType::Integer).non_nullable())
        .with_column(
            "email",
            ColumnSpec::new(ValueType::String)
                .with_regex(r"[^@]+@[^@]+")
                .unwrap(),
        )
        .with_column(
            "age",
            ColumnSpec::new(ValueType::Float).with_range(Some(0.0), Some(120.0)),
        )
        .with_column(
            "status",
            ColumnSpec::new(ValueType::String).with_isin(vec![json!("active"), json!("closed")]),
        );
    RuleConfig::new(
        "round_trip",
        vec![
            CleaningRule::new("dedupe", CleaningOperation::DropDuplicates)
                .unwrap()
                .with_order(9),
            CleaningRule::new("trim", CleaningOperation::TrimWhitespace)
                .unwrap()
                .with_columns(ColumnSelector::pattern(r"col_\d+").unwrap()),
            CleaningRule::new("outliers", CleaningOperation::RemoveOutliers)
                .unwrap()
                .with_columns(ColumnSelector::columns(["age"]))
                .with_parameter("method", "zscore")
                .with_parameter("threshold", 2.5)
                .with_order(4),
            CleaningRule::new("filter", CleaningOperation::Filter)
                .unwrap()
                .with_columns(ColumnSelector::columns(["status"]))
                .with_parameter("operator", "in")
                .with_parameter("value", json!(["active", "closed"]))
                .with_order(4)
                .disabled(),
            CleaningRule::new("cast", CleaningOperation::CastType)
                .unwrap()
                .with_columns(ColumnSelector::Unspecified)
                .with_parameter("dtype", "integer")
                .with_parameter("strict", true)
                .with_parameter("retries", 3),
        ],
    )
    .unwrap()
    .with_description("all the shapes")
    .with_input_contract(contract.clone())
    .with_output_contract(contract.with_coerce(true))
}

#[test]
fn loads_toml_document() {
    let config = RuleConfig::from_toml_str(EMAIL_RULES).unwrap();

    assert_eq!(config.name(), "email_cleanup");
    assert_eq!(config.description(), Some("Normalise contact emails"));
    let names: Vec<&str> = config.rules().iter().map(CleaningRule::name).collect();
    assert_eq!(names, vec!["trim", "fill_age", "lowercase"]);
    assert_eq!(
        config.rules()[0].operation(),
        CleaningOperation::TrimWhitespace
    );
    assert!(!config.rules()[1].is_enabled());
    assert_eq!(config.enabled_rules().count(), 2);
    assert!(!config.observability().enabled);
    assert_eq!(config.observability().service_name, "emails");
    assert_eq!(
        config.observability().extra.get("console_export"),
        Some(&json!(false))
    );
    let contract = config.input_contract().unwrap();
    assert!(!contract.strict);
    assert_eq!(contract.columns["email"].dtype, ValueType::String);
    assert!(config.output_contract().is_none());
}

#[test]
fn omitted_selector_targets_all_columns() {
    let text = r#"
name = "defaults"

[[rules]]
name = "upper"
operation = "uppercase"
"#;
    let config = RuleConfig::from_toml_str(text).unwrap();
    let rule = &config.rules()[0];
    assert_eq!(rule.columns(), &ColumnSelector::All);
    assert!(rule.is_enabled());
    assert_eq!(rule.order(), 0);
}

#[test]
fn toml_round_trip_is_lossless() {
    let config = sample_config();
    let text = config.to_toml_string().unwrap();
    let reloaded = RuleConfig::from_toml_str(&text).unwrap();
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.rules(), config.rules());
}

#[test]
fn json_round_trip_is_lossless() {
    let config = sample_config();
    let text = config.to_json_string().unwrap();
    let reloaded = RuleConfig::from_json_str(&text).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn document_with_extra_observability_keys_round_trips() {
    let config = RuleConfig::from_toml_str(EMAIL_RULES).unwrap();
    let reloaded = RuleConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn save_and_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = sample_config();
    for file in ["rules.toml", "rules.json"] {
        let path = dir.path().join(file);
        config.save(&path).unwrap();
        let reloaded = RuleConfig::from_path(&path).unwrap();
        assert_eq!(reloaded, config, "{file}");
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yaml");
    std::fs::write(&path, "name: x").unwrap();
    let err = RuleConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn conflicting_selector_names_the_rule() {
    let text = r#"
name = "bad"

[[rules]]
name = "ok"
operation = "lowercase"

[[rules]]
name = "broken"
operation = "lowercase"
columns = { columns = ["a"], pattern = "b" }
"#;
    let err = RuleConfig::from_toml_str(text).unwrap_err();
    assert_eq!(err.field(), Some("rules[1].columns"));
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid `rules[1].columns`: cannot specify both 'columns' and 'pattern'"
    );
}

#[test]
fn invalid_selector_pattern_is_rejected() {
    let text = r#"
name = "bad"

[[rules]]
name = "broken"
operation = "lowercase"
columns = { pattern = "(" }
"#;
    let err = RuleConfig::from_toml_str(text).unwrap_err();
    assert_eq!(err.field(), Some("rules[0].columns.pattern"));
}

#[test]
fn unknown_operation_is_a_configuration_error() {
    let text = r#"
name = "bad"

[[rules]]
name = "mystery"
operation = "explode"
"#;
    let err = RuleConfig::from_toml_str(text).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownOperation { ref field, ref value }
            if field == "rules[0].operation" && value == "explode"
    ));
}

#[test]
fn missing_rule_name_is_reported() {
    let text = r#"{"name": "bad", "rules": [{"operation": "lowercase"}]}"#;
    let err = RuleConfig::from_json_str(text).unwrap_err();
    assert_eq!(err.field(), Some("rules[0].name"));
}

#[test]
fn contract_errors_name_the_contract() {
    let text = r#"
name = "bad"
rules = []

[output_contract.columns.age]
dtype = "decimal"
"#;
    let err = RuleConfig::from_toml_str(text).unwrap_err();
    assert_eq!(err.field(), Some("output_contract.columns.age.dtype"));
}

#[test]
fn serde_deserialize_goes_through_validation() {
    let json = r#"{"columns": ["a"], "all": true}"#;
    let result: Result<ColumnSelector, _> = serde_json::from_str(json);
    assert!(result.is_err());
}
