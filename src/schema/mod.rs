//! # Schema Introspection
//!
//! Reads table and column metadata from a live database and normalizes it
//! into engine-neutral descriptors.
//!
//! Every supported engine family implements [`SchemaSource`]; the variant is
//! chosen once, by [`Engine`], in [`connect`]. Nothing downstream of this
//! module ever branches on the engine.
//!
//! ```text
//! ConnectionConfig ─connect→ Box<dyn SchemaSource> ─introspect→ Vec<TableDescriptor>
//! ```
//!
//! The source owns the connection. [`introspect`] consumes it, so the
//! connection is released when introspection returns, on every path.

mod mysql;
mod postgres;
mod sqlite;
#[cfg(test)]
mod tests;

pub use self::mysql::MySqlSource;
pub use self::postgres::PostgresSource;
pub use self::sqlite::SqliteSource;

use crate::error::{GenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Supported database engine families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// PostgreSQL and wire-compatible engines
    #[value(alias = "postgresql", alias = "pg")]
    Postgres,
    /// MySQL and MariaDB
    #[value(alias = "mariadb")]
    Mysql,
    /// SQLite database files
    #[value(alias = "sqlite3")]
    Sqlite,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Postgres => "postgres",
            Engine::Mysql => "mysql",
            Engine::Sqlite => "sqlite",
        })
    }
}

/// One database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table
    pub name: String,
    /// Engine-specific type token (`varchar`, `int4`, `numeric(10,2)`)
    pub native_type: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether the column is part of the primary key
    pub is_primary_key: bool,
    /// Declared maximum length for character types
    pub max_length: Option<u32>,
    /// Default expression as reported by the engine
    pub default_value: Option<String>,
}

/// A foreign key from one column to a column of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Referencing column in this table
    pub column: String,
    /// Referenced table
    pub referenced_table: String,
    /// Referenced column; `None` when the engine leaves it implicit (the primary key)
    pub referenced_column: Option<String>,
}

/// One table or view with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// Table name, unique within the schema
    pub name: String,
    /// Columns in ordinal order
    pub columns: Vec<ColumnDescriptor>,
    /// Outgoing foreign keys
    pub foreign_keys: Vec<ForeignKey>,
}

/// Metadata capabilities every engine variant provides.
pub trait SchemaSource {
    /// Engine family of this source.
    fn engine(&self) -> Engine;

    /// Names of the tables and views visible in the connected schema, sorted.
    fn table_names(&mut self) -> Result<Vec<String>>;

    /// Columns of `table` in ordinal order.
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Foreign keys declared on `table`.
    fn foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKey>>;
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Engine family
    pub engine: Engine,
    /// Full connection string; takes precedence over the individual parts
    pub url: Option<String>,
    /// Server host
    pub host: Option<String>,
    /// Server port
    pub port: Option<u16>,
    /// User name
    pub user: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Database name, or the database file for SQLite
    pub dbname: Option<String>,
    /// PostgreSQL schema to read (default `public`)
    pub schema: Option<String>,
}

impl ConnectionConfig {
    /// A config for `engine` with no connection details set.
    pub fn new(engine: Engine) -> Self {
        ConnectionConfig {
            engine,
            url: None,
            host: None,
            port: None,
            user: None,
            password: None,
            dbname: None,
            schema: None,
        }
    }

    /// Config for a SQLite database file.
    pub fn sqlite(path: impl Into<String>) -> Self {
        ConnectionConfig {
            dbname: Some(path.into()),
            ..ConnectionConfig::new(Engine::Sqlite)
        }
    }

    /// libpq-style key/value string built from the individual parts.
    pub fn postgres_params(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let mut params = vec!["sslmode=disable".to_string()];
        let parts = [
            ("host", self.host.clone()),
            ("port", self.port.map(|p| p.to_string())),
            ("user", self.user.clone()),
            ("password", self.password.clone()),
            ("dbname", self.dbname.clone()),
        ];
        for (key, value) in parts {
            if let Some(value) = value {
                params.push(format!("{key}='{}'", value.replace('\\', "\\\\").replace('\'', "\\'")));
            }
        }
        params.join(" ")
    }

    fn connection_error(&self, err: impl fmt::Display) -> GenError {
        GenError::Connection {
            engine: self.engine.to_string(),
            message: err.to_string(),
        }
    }
}

/// Open a connection and wrap it in the engine's [`SchemaSource`].
pub fn connect(config: &ConnectionConfig) -> Result<Box<dyn SchemaSource>> {
    info!(engine = %config.engine, "connecting");
    let source: Box<dyn SchemaSource> = match config.engine {
        Engine::Postgres => Box::new(
            PostgresSource::connect(config).map_err(|e| config.connection_error(e))?,
        ),
        Engine::Mysql => {
            Box::new(MySqlSource::connect(config).map_err(|e| config.connection_error(e))?)
        }
        Engine::Sqlite => {
            Box::new(SqliteSource::open(config).map_err(|e| config.connection_error(e))?)
        }
    };
    Ok(source)
}

/// Read every table of the schema, then release the connection.
///
/// `only` restricts the result to the listed tables (in schema order); a listed
/// table that does not exist is an error. An empty schema is an error too.
pub fn introspect(
    mut source: Box<dyn SchemaSource>,
    only: &[String],
) -> Result<Vec<TableDescriptor>> {
    let mut names = source.table_names()?;
    if names.is_empty() {
        return Err(GenError::SchemaRead(format!(
            "no tables found in the {} schema",
            source.engine()
        )));
    }
    if !only.is_empty() {
        if let Some(missing) = only.iter().find(|t| !names.contains(t)) {
            return Err(GenError::SchemaRead(format!("table `{missing}` does not exist")));
        }
        names.retain(|n| only.contains(n));
    }

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let columns = source.columns(&name)?;
        if columns.is_empty() {
            return Err(GenError::SchemaRead(format!("table `{name}` has no columns")));
        }
        let foreign_keys = source.foreign_keys(&name)?;
        debug!(table = %name, columns = columns.len(), foreign_keys = foreign_keys.len(), "introspected table");
        tables.push(TableDescriptor {
            name,
            columns,
            foreign_keys,
        });
    }
    info!(tables = tables.len(), "schema introspection complete");
    Ok(tables)
}
