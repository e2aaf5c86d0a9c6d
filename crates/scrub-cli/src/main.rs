//! The `scrub` command-line tool.

use clap::{ColorChoice, Parser};
use scrub_cli::logging::{LogConfig, LogFormat, init_logging};
use scrub_core::EngineError;
use scrub_validate::ContractError;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, StoreCommand};
use crate::commands::{
    run_check, run_clean, run_infer_contract, run_store_clean, run_store_export, run_store_import,
    run_store_tables,
};
use crate::summary::{print_clean_summary, print_issues, print_operations, print_rules};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Clean(args) => run_clean(&args).map(|result| {
            print_clean_summary(&result.report, result.output.as_deref());
        }),
        Command::Check(args) => run_check(&args).map(|config| print_rules(&config)),
        Command::InferContract(args) => run_infer_contract(&args),
        Command::Operations => {
            print_operations();
            Ok(())
        }
        Command::Store(command) => match command {
            StoreCommand::Import(args) => run_store_import(&args),
            StoreCommand::Export(args) => run_store_export(&args),
            StoreCommand::Tables(args) => run_store_tables(&args),
            StoreCommand::Clean(args) => run_store_clean(&args),
        },
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            if let Some(issues) = contract_issues(&error) {
                print_issues(issues);
            }
            1
        }
    };
    std::process::exit(exit_code);
}

/// Issues carried by a contract failure anywhere in the error chain.
fn contract_issues(error: &anyhow::Error) -> Option<&[scrub_validate::ContractIssue]> {
    error.chain().find_map(|cause| {
        if let Some(EngineError::Contract(contract)) = cause.downcast_ref::<EngineError>() {
            return Some(contract.issues());
        }
        cause
            .downcast_ref::<ContractError>()
            .map(ContractError::issues)
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
