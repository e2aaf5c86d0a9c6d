use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use scrub_core::{CleanReport, RuleOutcome, RuleStatus};
use scrub_model::{CleaningOperation, RuleConfig};
use scrub_validate::ContractIssue;

pub fn print_clean_summary(report: &CleanReport, output: Option<&Path>) {
    println!("Rules: {}", report.config_name);
    if let Some(path) = output {
        println!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Rule"),
        header_cell("Operation"),
        header_cell("Columns"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Removed"),
        header_cell("ms"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);
    for (idx, outcome) in report.rules.iter().enumerate() {
        table.add_row(rule_row(idx + 1, outcome));
    }
    table.add_row(vec![
        dim_cell(""),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} applied, {} skipped", report.applied(), report.skipped()))
            .fg(Color::Cyan),
        Cell::new(format!(
            "{} -> {}",
            report.input.columns, report.output.columns
        )),
        dim_cell("-"),
        Cell::new(format!("{} -> {}", report.input.rows, report.output.rows))
            .add_attribute(Attribute::Bold),
        count_cell(Some(report.rows_removed()), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Contracts: input {}, output {}",
        validated_label(report.input_validated),
        validated_label(report.output_validated)
    );
}

fn rule_row(position: usize, outcome: &RuleOutcome) -> Vec<Cell> {
    let columns = if outcome.columns.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(outcome.columns.join(", "))
    };
    match outcome.status {
        RuleStatus::Applied => vec![
            Cell::new(position),
            Cell::new(&outcome.rule).add_attribute(Attribute::Bold),
            Cell::new(outcome.operation).fg(Color::Blue),
            columns,
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Cell::new(outcome.rows_after),
            count_cell(
                Some(outcome.rows_before.saturating_sub(outcome.rows_after)),
                Color::Yellow,
            ),
            dim_cell(outcome.duration_ms),
        ],
        RuleStatus::Skipped => vec![
            dim_cell(position),
            dim_cell(&outcome.rule),
            dim_cell(outcome.operation),
            columns,
            dim_cell("skipped"),
            dim_cell(outcome.rows_after),
            dim_cell("-"),
            dim_cell("-"),
        ],
    }
}

fn validated_label(validated: bool) -> &'static str {
    if validated { "checked" } else { "not checked" }
}

/// Print the rules of `config` in execution order.
pub fn print_rules(config: &RuleConfig) {
    println!("Rules: {} (version {})", config.name(), config.version());
    if let Some(description) = config.description() {
        println!("{description}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Order"),
        header_cell("Rule"),
        header_cell("Operation"),
        header_cell("Columns"),
        header_cell("Parameters"),
        header_cell("Enabled"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for rule in config.rules() {
        let parameters = if rule.parameters().is_empty() {
            dim_cell("-")
        } else {
            Cell::new(
                rule.parameters()
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };
        let enabled = if rule.is_enabled() {
            Cell::new("✓").fg(Color::Green)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(rule.order()),
            Cell::new(rule.name()).add_attribute(Attribute::Bold),
            Cell::new(rule.operation()).fg(Color::Blue),
            Cell::new(rule.columns()),
            parameters,
            enabled,
        ]);
    }
    println!("{table}");
    println!(
        "Contracts: input {}, output {}",
        present_label(config.input_contract().is_some()),
        present_label(config.output_contract().is_some())
    );
}

fn present_label(present: bool) -> &'static str {
    if present { "declared" } else { "none" }
}

pub fn print_operations() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Operation"),
        header_cell("Description"),
        header_cell("Parameters"),
    ]);
    apply_table_style(&mut table);
    for operation in CleaningOperation::ALL {
        let parameters = operation.parameters();
        table.add_row(vec![
            Cell::new(operation).fg(Color::Blue),
            Cell::new(operation.description()),
            if parameters.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(parameters.join(", "))
            },
        ]);
    }
    println!("{table}");
}

pub fn print_tables(tables: &[String]) {
    if tables.is_empty() {
        println!("No tables.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table")]);
    apply_table_style(&mut table);
    for name in tables {
        table.add_row(vec![Cell::new(name)]);
    }
    println!("{table}");
}

/// Print contract issues to stderr.
pub fn print_issues(issues: &[ContractIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Issue"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.column()).add_attribute(Attribute::Bold),
            Cell::new(issue_label(issue)).fg(Color::Red),
            count_cell(issue.count().map(|count| count as usize), Color::Red),
            Cell::new(issue.message()),
        ]);
    }
    eprintln!("Issues:");
    eprintln!("{table}");
}

fn issue_label(issue: &ContractIssue) -> &'static str {
    match issue {
        ContractIssue::MissingColumn { .. } => "missing",
        ContractIssue::UnexpectedColumn { .. } => "unexpected",
        ContractIssue::TypeMismatch { .. } => "type",
        ContractIssue::NullValues { .. } => "nulls",
        ContractIssue::BelowMinimum { .. } => "min",
        ContractIssue::AboveMaximum { .. } => "max",
        ContractIssue::PatternMismatch { .. } => "regex",
        ContractIssue::NotInSet { .. } => "isin",
        ContractIssue::CoercionFailed { .. } => "coerce",
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
