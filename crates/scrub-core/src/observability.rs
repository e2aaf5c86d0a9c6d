//! Span-scoped tracing for engine runs.
//!
//! A [`Tracer`] hands out `tracing` spans tagged with the configured service
//! name. A disabled tracer hands out [`Span::none`], so instrumented code runs
//! identically with tracing off.

use polars::prelude::DataFrame;
use scrub_model::{CleaningRule, DEFAULT_SERVICE_NAME, ObservabilityConfig};
use tracing::{Span, field, info_span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracer {
    enabled: bool,
    service_name: String,
}

impl Tracer {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            service_name: service_name.into(),
        }
    }

    /// A tracer whose spans are all no-ops.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    pub fn from_config(config: &ObservabilityConfig) -> Self {
        Self {
            enabled: config.enabled,
            service_name: config.service_name.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Span covering one `clean` call. Output counts are recorded by
    /// [`Tracer::record_output`].
    pub fn clean_span(&self, config_name: &str, df: &DataFrame, rules: usize) -> Span {
        if !self.enabled {
            return Span::none();
        }
        info_span!(
            "engine.clean",
            service = %self.service_name,
            config = %config_name,
            input_rows = df.height(),
            input_columns = df.width(),
            rules_count = rules,
            output_rows = field::Empty,
            output_columns = field::Empty,
        )
    }

    /// Span covering one rule application.
    pub fn rule_span(&self, rule: &CleaningRule, df: &DataFrame) -> Span {
        if !self.enabled {
            return Span::none();
        }
        info_span!(
            "engine.apply_rule",
            service = %self.service_name,
            rule_name = %rule.name(),
            operation = %rule.operation(),
            input_rows = df.height(),
            input_columns = df.width(),
            output_rows = field::Empty,
            output_columns = field::Empty,
        )
    }

    pub fn record_output(span: &Span, df: &DataFrame) {
        span.record("output_rows", df.height());
        span.record("output_columns", df.width());
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::from_config(&ObservabilityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_tracer_yields_no_op_spans() {
        let tracer = Tracer::disabled();
        let span = tracer.clean_span("cfg", &DataFrame::empty(), 0);
        assert!(span.is_none());
    }

    #[test]
    fn config_controls_tracer() {
        let config = ObservabilityConfig {
            enabled: false,
            ..ObservabilityConfig::default()
        };
        assert!(!Tracer::from_config(&config).is_enabled());
        assert_eq!(Tracer::default().service_name(), DEFAULT_SERVICE_NAME);
    }
}
