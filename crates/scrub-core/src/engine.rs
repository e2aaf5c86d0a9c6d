//! The rule pipeline executor.

use std::path::Path;
use std::time::Instant;

use polars::prelude::DataFrame;
use scrub_model::{CleaningRule, RuleConfig};
use scrub_store::{IfExists, SqliteStore};
use scrub_transform::{OperationRegistry, resolve_columns};
use scrub_validate::{ContractPhase, infer_contract, validate};
use tracing::{debug, info, info_span};

use crate::error::{EngineError, Result};
use crate::observability::Tracer;
use crate::report::{CleanReport, FrameShape, RuleOutcome, RuleStatus};

/// Which contracts a `clean` call checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub validate_input: bool,
    pub validate_output: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            validate_input: true,
            validate_output: true,
        }
    }
}

impl CleanOptions {
    /// Skip both contract checks.
    pub fn unvalidated() -> Self {
        Self {
            validate_input: false,
            validate_output: false,
        }
    }
}

/// Applies a [`RuleConfig`] to datasets.
///
/// An engine starts unconfigured; `clean` fails with
/// [`EngineError::NotConfigured`] until a configuration is loaded. Each call
/// validates the input contract, folds the enabled rules over the frame in
/// order, then validates the output contract. Any failure aborts the call
/// and the caller's frame is never modified.
#[derive(Debug)]
pub struct CleaningEngine {
    config: Option<RuleConfig>,
    registry: OperationRegistry,
    store: Option<SqliteStore>,
    tracing: bool,
}

impl CleaningEngine {
    /// An unconfigured engine with the standard operations and tracing on.
    pub fn new() -> Self {
        Self {
            config: None,
            registry: OperationRegistry::standard(),
            store: None,
            tracing: true,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RuleConfig) -> Self {
        self.load_config(config);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: SqliteStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Turn span emission on or off. The configuration's own
    /// `observability.enabled` flag must also be set for spans to appear.
    #[must_use]
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn load_config(&mut self, config: RuleConfig) {
        debug!(
            config = config.name(),
            version = config.version(),
            rules = config.rules().len(),
            "configuration loaded"
        );
        self.config = Some(config);
    }

    /// Load a rule document from disk.
    pub fn load_config_file(&mut self, path: &Path) -> Result<()> {
        let _span = info_span!("engine.load_config", path = %path.display()).entered();
        let config = RuleConfig::from_path(path)?;
        self.load_config(config);
        Ok(())
    }

    pub fn config(&self) -> Option<&RuleConfig> {
        self.config.as_ref()
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn store(&self) -> Option<&SqliteStore> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut SqliteStore> {
        self.store.as_mut()
    }

    fn require_config(&self) -> Result<&RuleConfig> {
        self.config.as_ref().ok_or(EngineError::NotConfigured)
    }

    /// Tracer for the current configuration.
    pub fn tracer(&self) -> Tracer {
        match &self.config {
            Some(config) if self.tracing => Tracer::from_config(config.observability()),
            _ => Tracer::disabled(),
        }
    }

    /// Clean `df` and return the resulting frame.
    pub fn clean(&self, df: &DataFrame, options: CleanOptions) -> Result<DataFrame> {
        self.clean_with_report(df, options).map(|(cleaned, _)| cleaned)
    }

    /// Clean `df`, returning the frame together with a per-rule report.
    pub fn clean_with_report(
        &self,
        df: &DataFrame,
        options: CleanOptions,
    ) -> Result<(DataFrame, CleanReport)> {
        let config = self.require_config()?;
        let tracer = self.tracer();
        let span = tracer.clean_span(config.name(), df, config.rules().len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut report = CleanReport {
            config_name: config.name().to_string(),
            input: FrameShape::of(df),
            output: FrameShape::default(),
            input_validated: false,
            output_validated: false,
            rules: Vec::with_capacity(config.rules().len()),
        };

        let mut working = match config.input_contract() {
            Some(contract) if options.validate_input => {
                report.input_validated = true;
                validate(df, contract, ContractPhase::Input)?
            }
            _ => df.clone(),
        };

        for rule in config.rules() {
            if !rule.is_enabled() {
                debug!(rule = rule.name(), "rule disabled; skipping");
                report.rules.push(skipped(rule, &working));
                continue;
            }
            let (next, outcome) = self.apply_rule(&tracer, rule, working)?;
            working = next;
            report.rules.push(outcome);
        }

        if let Some(contract) = config.output_contract()
            && options.validate_output
        {
            report.output_validated = true;
            working = validate(&working, contract, ContractPhase::Output)?;
        }

        Tracer::record_output(&span, &working);
        report.output = FrameShape::of(&working);
        info!(
            config = config.name(),
            input_rows = report.input.rows,
            output_rows = report.output.rows,
            rules_applied = report.applied(),
            duration_ms = start.elapsed().as_millis(),
            "clean complete"
        );
        Ok((working, report))
    }

    /// Resolve the rule's columns against the current frame and run it.
    fn apply_rule(
        &self,
        tracer: &Tracer,
        rule: &CleaningRule,
        df: DataFrame,
    ) -> Result<(DataFrame, RuleOutcome)> {
        let span = tracer.rule_span(rule, &df);
        let _guard = span.enter();
        let start = Instant::now();
        let before = FrameShape::of(&df);

        let columns = resolve_columns(rule.columns(), &df);
        debug!(rule = rule.name(), columns = ?columns, "columns resolved");
        let out = self
            .registry
            .apply(rule.operation(), df, &columns, rule.parameters())
            .map_err(|source| EngineError::Rule {
                rule: rule.name().to_string(),
                source,
            })?;

        Tracer::record_output(&span, &out);
        let after = FrameShape::of(&out);
        let outcome = RuleOutcome {
            rule: rule.name().to_string(),
            operation: rule.operation(),
            status: RuleStatus::Applied,
            columns,
            rows_before: before.rows,
            rows_after: after.rows,
            columns_before: before.columns,
            columns_after: after.columns,
            duration_ms: start.elapsed().as_millis(),
        };
        Ok((out, outcome))
    }

    /// Load `table` from the store, clean it with default options and, when
    /// `output_table` is given, save the result there (replacing it).
    pub fn clean_from_storage(
        &mut self,
        table: &str,
        output_table: Option<&str>,
    ) -> Result<DataFrame> {
        let _span = info_span!("engine.clean_from_storage", table).entered();
        let store = self.store.as_ref().ok_or(EngineError::StoreMissing)?;
        let df = store.load_table(table, None)?;
        let cleaned = self.clean(&df, CleanOptions::default())?;
        if let Some(output_table) = output_table {
            let store = self.store.as_mut().ok_or(EngineError::StoreMissing)?;
            store.save_table(&cleaned, output_table, IfExists::Replace)?;
        }
        Ok(cleaned)
    }

    /// Set contracts inferred from `sample` wherever the configuration has none.
    pub fn infer_contracts(&mut self, sample: &DataFrame) -> Result<()> {
        let _span = info_span!("engine.infer_contracts").entered();
        let mut config = self.config.take().ok_or(EngineError::NotConfigured)?;
        let inferred = infer_contract(sample, true);
        if config.input_contract().is_none() {
            config = config.with_input_contract(inferred.clone());
        }
        if config.output_contract().is_none() {
            config = config.with_output_contract(inferred);
        }
        self.config = Some(config);
        Ok(())
    }

    /// Write the current configuration, format chosen by extension.
    pub fn save_config(&self, path: &Path) -> Result<()> {
        let _span = info_span!("engine.save_config", path = %path.display()).entered();
        self.require_config()?.save(path)?;
        Ok(())
    }
}

impl Default for CleaningEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn skipped(rule: &CleaningRule, df: &DataFrame) -> RuleOutcome {
    let shape = FrameShape::of(df);
    RuleOutcome {
        rule: rule.name().to_string(),
        operation: rule.operation(),
        status: RuleStatus::Skipped,
        columns: Vec::new(),
        rows_before: shape.rows,
        rows_after: shape.rows,
        columns_before: shape.columns,
        columns_after: shape.columns,
        duration_ms: 0,
    }
}
