//! Error types for the store.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation ran before `connect` or after `close`.
    #[error("not connected to database; call connect() first")]
    NotConnected,

    #[error("table '{table}' already exists")]
    TableExists { table: String },

    #[error("table '{table}' does not exist")]
    TableNotFound { table: String },

    #[error("cannot store table '{table}' without columns")]
    NoColumns { table: String },

    #[error("failed to prepare database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for StoreError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
