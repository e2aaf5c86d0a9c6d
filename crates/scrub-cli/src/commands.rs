use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scrub_core::{CleanOptions, CleanReport, CleaningEngine};
use scrub_model::RuleConfig;
use scrub_store::SqliteStore;
use scrub_validate::infer_contract;
use tracing::{info, info_span};

use scrub_cli::io::{read_csv, write_csv};

use crate::cli::{
    CheckArgs, CleanArgs, ExportArgs, ImportArgs, InferArgs, StoreCleanArgs, TablesArgs,
};
use crate::summary::print_tables;

/// What a `clean` run produced.
pub struct CleanResult {
    pub report: CleanReport,
    pub output: Option<PathBuf>,
}

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let _span = info_span!("clean", input = %args.input.display()).entered();
    let mut engine = CleaningEngine::new().with_tracing(!args.no_tracing);
    engine
        .load_config_file(&args.config)
        .with_context(|| format!("load rules {}", args.config.display()))?;
    let df = read_csv(&args.input)?;

    let options = CleanOptions {
        validate_input: !args.skip_input_validation,
        validate_output: !args.skip_output_validation,
    };
    let (mut cleaned, report) = engine
        .clean_with_report(&df, options)
        .with_context(|| format!("clean {}", args.input.display()))?;

    if let Some(path) = &args.output {
        write_csv(&mut cleaned, path)?;
        info!(path = %path.display(), rows = cleaned.height(), "cleaned data written");
    }
    Ok(CleanResult {
        report,
        output: args.output.clone(),
    })
}

pub fn run_check(args: &CheckArgs) -> Result<RuleConfig> {
    RuleConfig::from_path(&args.config)
        .with_context(|| format!("load rules {}", args.config.display()))
}

pub fn run_infer_contract(args: &InferArgs) -> Result<()> {
    let _span = info_span!("infer_contract", input = %args.input.display()).entered();
    let df = read_csv(&args.input)?;
    let contract = infer_contract(&df, !args.lenient);
    let text = toml::to_string(&contract).context("render contract")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("write contract {}", path.display()))?;
            info!(path = %path.display(), columns = contract.columns.len(), "contract written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn run_store_import(args: &ImportArgs) -> Result<()> {
    let _span = info_span!("store_import", table = %args.table).entered();
    let df = read_csv(&args.input)?;
    let mut store = open_store(&args.database)?;
    let rows = store
        .save_table(&df, &args.table, args.if_exists.into())
        .with_context(|| format!("save table {}", args.table))?;
    println!("Imported {rows} rows into '{}'", args.table);
    Ok(())
}

pub fn run_store_export(args: &ExportArgs) -> Result<()> {
    let _span = info_span!("store_export", table = %args.table).entered();
    let store = open_store(&args.database)?;
    let mut df = store
        .load_table(&args.table, args.limit)
        .with_context(|| format!("load table {}", args.table))?;
    write_csv(&mut df, &args.output)?;
    println!(
        "Exported {} rows from '{}' to {}",
        df.height(),
        args.table,
        args.output.display()
    );
    Ok(())
}

pub fn run_store_tables(args: &TablesArgs) -> Result<()> {
    let store = open_store(&args.database)?;
    let tables = store.list_tables().context("list tables")?;
    print_tables(&tables);
    Ok(())
}

pub fn run_store_clean(args: &StoreCleanArgs) -> Result<()> {
    let _span = info_span!("store_clean", table = %args.table).entered();
    let store = open_store(&args.database)?;
    let mut engine = CleaningEngine::new().with_store(store);
    engine
        .load_config_file(&args.config)
        .with_context(|| format!("load rules {}", args.config.display()))?;
    let cleaned = engine
        .clean_from_storage(&args.table, args.output_table.as_deref())
        .with_context(|| format!("clean table {}", args.table))?;
    match &args.output_table {
        Some(output) => println!(
            "Cleaned '{}': {} rows saved to '{output}'",
            args.table,
            cleaned.height()
        ),
        None => println!("Cleaned '{}': {} rows", args.table, cleaned.height()),
    }
    Ok(())
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).with_context(|| format!("open database {}", path.display()))
}
