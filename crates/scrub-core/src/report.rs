//! Per-run summaries of a `clean` call.

use polars::prelude::DataFrame;
use scrub_model::CleaningOperation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Applied,
    /// The rule is disabled and was not run.
    Skipped,
}

/// What one rule did to the working frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub operation: CleaningOperation,
    pub status: RuleStatus,
    /// Columns the selector resolved to; empty for skipped rules.
    pub columns: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub duration_ms: u128,
}

/// Shape of a frame at one point in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameShape {
    pub rows: usize,
    pub columns: usize,
}

impl FrameShape {
    pub fn of(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df.width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub config_name: String,
    pub input: FrameShape,
    pub output: FrameShape,
    pub input_validated: bool,
    pub output_validated: bool,
    pub rules: Vec<RuleOutcome>,
}

impl CleanReport {
    pub fn applied(&self) -> usize {
        self.rules
            .iter()
            .filter(|outcome| outcome.status == RuleStatus::Applied)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.rules.len() - self.applied()
    }

    pub fn rows_removed(&self) -> usize {
        self.input.rows.saturating_sub(self.output.rows)
    }
}
