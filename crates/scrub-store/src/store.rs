//! SQLite-backed table store.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::{AnyValue, DataFrame};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params, params_from_iter};
use tracing::{debug, debug_span, trace};

use crate::convert::{SqlKind, to_column, to_sql};
use crate::error::{Result, StoreError};

pub const IN_MEMORY: &str = ":memory:";

/// What `save_table` does when the table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IfExists {
    /// Drop the table and recreate it from the frame.
    #[default]
    Replace,
    /// Insert the frame's rows into the existing table.
    Append,
    /// Refuse with [`StoreError::TableExists`].
    Fail,
}

impl IfExists {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfExists {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown if-exists policy '{other}'")),
        }
    }
}

/// A SQLite database holding cleaned and raw tables.
///
/// The store starts disconnected; every table operation requires
/// [`SqliteStore::connect`] first and fails with [`StoreError::NotConnected`]
/// otherwise. Dropping the store closes its connection.
pub struct SqliteStore {
    path: Option<PathBuf>,
    connection: Option<Connection>,
}

impl SqliteStore {
    /// A store over the database file at `path`, not yet connected.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            connection: None,
        }
    }

    /// A store over a private in-memory database, not yet connected.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            connection: None,
        }
    }

    /// A connected store over the database file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        store.connect()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Database location for display: the file path or `:memory:`.
    pub fn location(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| IN_MEMORY.to_string(), |path| path.display().to_string())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the connection. Connecting an already connected store does nothing.
    pub fn connect(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        let _span = debug_span!("store.connect", location = %self.location()).entered();
        let connection = match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                Connection::open(path)?
            }
            None => Connection::open_in_memory()?,
        };
        self.connection = Some(connection);
        Ok(())
    }

    /// Close the connection. Closing a disconnected store does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            let _span = debug_span!("store.close", location = %self.location()).entered();
            connection.close().map_err(|(_, err)| err)?;
        }
        Ok(())
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(StoreError::NotConnected)
    }

    /// Write `df` to `table`, returning the number of rows written.
    ///
    /// The whole write runs in one transaction; with [`IfExists::Fail`] an
    /// existing table is left untouched.
    pub fn save_table(
        &mut self,
        df: &DataFrame,
        table: &str,
        if_exists: IfExists,
    ) -> Result<usize> {
        let connection = self.connection.as_mut().ok_or(StoreError::NotConnected)?;
        let _span =
            debug_span!("store.save_table", table, rows = df.height(), %if_exists).entered();
        if df.width() == 0 {
            return Err(StoreError::NoColumns {
                table: table.to_string(),
            });
        }

        let exists = table_exists(connection, table)?;
        if exists && if_exists == IfExists::Fail {
            return Err(StoreError::TableExists {
                table: table.to_string(),
            });
        }

        let tx = connection.transaction()?;
        if exists && if_exists == IfExists::Replace {
            let sql = format!("DROP TABLE {}", quote(table));
            trace!(%sql);
            tx.execute(&sql, [])?;
        }
        if !exists || if_exists == IfExists::Replace {
            let sql = create_table_sql(df, table);
            trace!(%sql);
            tx.execute(&sql, [])?;
        }
        {
            let sql = insert_sql(df, table);
            trace!(%sql);
            let mut stmt = tx.prepare(&sql)?;
            let columns = df.get_columns();
            for idx in 0..df.height() {
                let row: Vec<SqlValue> = columns
                    .iter()
                    .map(|column| to_sql(column.get(idx).unwrap_or(AnyValue::Null)))
                    .collect();
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        debug!(table, rows = df.height(), "table saved");
        Ok(df.height())
    }

    /// Read `table`, optionally limited to its first `limit` rows.
    ///
    /// Column types come from the table's declared types, falling back to the
    /// values read.
    pub fn load_table(&self, table: &str, limit: Option<usize>) -> Result<DataFrame> {
        let connection = self.connection()?;
        let _span = debug_span!("store.load_table", table, ?limit).entered();
        if !table_exists(connection, table)? {
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
            });
        }
        let declared = declared_kinds(connection, table)?;
        let mut sql = format!("SELECT * FROM {}", quote(table));
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        read_frame(connection, &sql, &declared)
    }

    /// Run a query and return its rows as a frame.
    pub fn query(&self, sql: &str) -> Result<DataFrame> {
        let connection = self.connection()?;
        let _span = debug_span!("store.query").entered();
        read_frame(connection, sql, &HashMap::new())
    }

    /// Run one or more statements that return no rows.
    pub fn execute(&self, sql: &str) -> Result<()> {
        let connection = self.connection()?;
        let _span = debug_span!("store.execute").entered();
        trace!(%sql);
        connection.execute_batch(sql)?;
        Ok(())
    }

    /// User tables in name order.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let connection = self.connection()?;
        let mut stmt = connection.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    pub fn has_table(&self, table: &str) -> Result<bool> {
        table_exists(self.connection()?, table)
    }
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("location", &self.location())
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Quote an identifier for SQL text.
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn create_table_sql(df: &DataFrame, table: &str) -> String {
    let columns: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                quote(column.name()),
                SqlKind::for_dtype(column.dtype()).declared_type()
            )
        })
        .collect();
    format!("CREATE TABLE {} ({})", quote(table), columns.join(", "))
}

fn insert_sql(df: &DataFrame, table: &str) -> String {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| quote(column.name()))
        .collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

fn declared_kinds(connection: &Connection, table: &str) -> Result<HashMap<String, SqlKind>> {
    let mut stmt = connection.prepare(&format!("PRAGMA table_info({})", quote(table)))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows
        .into_iter()
        .filter_map(|(name, declared)| SqlKind::from_declared(&declared).map(|kind| (name, kind)))
        .collect())
}

fn read_frame(
    connection: &Connection,
    sql: &str,
    declared: &HashMap<String, SqlKind>,
) -> Result<DataFrame> {
    trace!(%sql);
    let mut stmt = connection.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut values: Vec<Vec<SqlValue>> = vec![Vec::new(); names.len()];

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get::<_, SqlValue>(idx)?);
        }
    }

    let columns = names
        .iter()
        .zip(&values)
        .map(|(name, column)| {
            let kind = declared
                .get(name)
                .copied()
                .unwrap_or_else(|| SqlKind::from_values(column));
            to_column(name, kind, column)
        })
        .collect::<polars::prelude::PolarsResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote("people"), "\"people\"");
        assert_eq!(quote("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn if_exists_parses() {
        assert_eq!("Append".parse::<IfExists>(), Ok(IfExists::Append));
        assert_eq!(IfExists::default(), IfExists::Replace);
        assert!("merge".parse::<IfExists>().is_err());
    }

    #[test]
    fn new_store_is_disconnected() {
        let store = SqliteStore::in_memory();
        assert!(!store.is_connected());
        assert_eq!(store.location(), IN_MEMORY);
    }
}
