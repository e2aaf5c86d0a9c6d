//! CLI argument definitions for `scrub`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use scrub_store::IfExists;

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Declarative, column-scoped data cleaning",
    long_about = "Clean tabular data with ordered rules loaded from TOML or JSON.\n\n\
                  Rules select columns by name or pattern, run one operation each,\n\
                  and can be bracketed by input and output data contracts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a CSV file with a rule document.
    Clean(CleanArgs),

    /// Load a rule document and list its rules in execution order.
    Check(CheckArgs),

    /// Describe a CSV sample as a data contract.
    InferContract(InferArgs),

    /// List the supported operations.
    Operations,

    /// Work with datasets kept in a SQLite file.
    #[command(subcommand)]
    Store(StoreCommand),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Rule document (.toml or .json).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// CSV file to clean.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the cleaned data to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not check the input contract.
    #[arg(long = "skip-input-validation")]
    pub skip_input_validation: bool,

    /// Do not check the output contract.
    #[arg(long = "skip-output-validation")]
    pub skip_output_validation: bool,

    /// Do not open engine spans, whatever the document says.
    #[arg(long = "no-tracing")]
    pub no_tracing: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Rule document (.toml or .json).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct InferArgs {
    /// CSV sample to describe.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the contract here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Allow columns the sample does not have.
    #[arg(long = "lenient")]
    pub lenient: bool,
}

#[derive(Subcommand)]
pub enum StoreCommand {
    /// Save a CSV file as a table.
    Import(ImportArgs),

    /// Write a table to a CSV file.
    Export(ExportArgs),

    /// List the tables in a database.
    Tables(TablesArgs),

    /// Clean a table with a rule document.
    Clean(StoreCleanArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// SQLite database file.
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "TABLE")]
    pub table: String,

    /// CSV file to import.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// What to do when the table already exists.
    #[arg(long = "if-exists", value_enum, default_value = "replace")]
    pub if_exists: IfExistsArg,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// SQLite database file.
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "TABLE")]
    pub table: String,

    /// CSV file to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Export at most this many rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// SQLite database file.
    #[arg(value_name = "DB")]
    pub database: PathBuf,
}

#[derive(Parser)]
pub struct StoreCleanArgs {
    /// SQLite database file.
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    /// Rule document (.toml or .json).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Table to clean.
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Save the cleaned rows to this table, replacing it.
    #[arg(long = "output-table", value_name = "NAME")]
    pub output_table: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IfExistsArg {
    Replace,
    Append,
    Fail,
}

impl From<IfExistsArg> for IfExists {
    fn from(arg: IfExistsArg) -> Self {
        match arg {
            IfExistsArg::Replace => IfExists::Replace,
            IfExistsArg::Append => IfExists::Append,
            IfExistsArg::Fail => IfExists::Fail,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_store_import() {
        let cli = Cli::try_parse_from([
            "scrub",
            "store",
            "import",
            "data.db",
            "customers",
            "customers.csv",
            "--if-exists",
            "fail",
        ])
        .unwrap();
        let Command::Store(StoreCommand::Import(args)) = cli.command else {
            panic!("expected store import");
        };
        assert_eq!(args.table, "customers");
        assert_eq!(IfExists::from(args.if_exists), IfExists::Fail);
    }

    #[test]
    fn parses_clean_flags() {
        let cli = Cli::try_parse_from([
            "scrub",
            "-v",
            "clean",
            "rules.toml",
            "in.csv",
            "--output",
            "out.csv",
            "--skip-input-validation",
            "--no-tracing",
        ])
        .unwrap();
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert!(args.skip_input_validation);
        assert!(!args.skip_output_validation);
        assert!(args.no_tracing);
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
    }
}
