//! CSV input and output for the command line.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

/// Rows scanned when guessing column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Read a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open {}", path.display()))?
        .finish()
        .with_context(|| format!("read csv {}", path.display()))?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "csv loaded");
    Ok(df)
}

/// Write `df` as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write csv {}", path.display()))?;
    debug!(path = %path.display(), rows = df.height(), "csv written");
    Ok(())
}
