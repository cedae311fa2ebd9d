//! Error taxonomy for a generation run.
//!
//! None of these are retried: every variant is a configuration or programming
//! fault that needs a human to fix the schema, the templates or the flags.

use std::path::PathBuf;

/// Errors raised by the generation engine.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The database could not be reached or refused the credentials.
    #[error("cannot connect to {engine} database: {message}")]
    Connection {
        /// Engine the connection was attempted for
        engine: String,
        /// Driver-provided reason
        message: String,
    },
    /// A metadata query failed, or the schema has no tables.
    #[error("cannot read schema: {0}")]
    SchemaRead(String),
    /// A column's native type has no mapping in the type table.
    #[error("unsupported type `{native_type}` for column `{table}.{column}`: {reason}")]
    UnsupportedType {
        /// Table owning the column
        table: String,
        /// Offending column
        column: String,
        /// Native type as reported by the database
        native_type: String,
        /// Why the mapping was refused
        reason: String,
    },
    /// A template failed to parse or referenced undefined data or helpers.
    #[error("template `{template}` failed: {message}")]
    Template {
        /// Template name (`model`, `controller`, `router`, ...)
        template: String,
        /// Renderer diagnostic
        message: String,
    },
    /// Rendered text is not well-formed Rust source.
    #[error("generated source for `{artifact}` is not valid Rust: {message}")]
    Format {
        /// Artifact that failed validation
        artifact: String,
        /// Parser diagnostic
        message: String,
    },
    /// Two tables (or two columns of one table) derive the same generated name.
    #[error("{kind} name `{name}` is derived from both `{first}` and `{second}`")]
    NameCollision {
        /// What collided: `struct`, `file` or `field`
        kind: &'static str,
        /// The colliding generated name
        name: String,
        /// First source name
        first: String,
        /// Second source name
        second: String,
    },
    /// Invalid configuration value or unreadable config/template file.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The output sink failed.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub(crate) fn schema_read(context: &str, err: impl std::fmt::Display) -> Self {
        GenError::SchemaRead(format!("{context}: {err}"))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = GenError> = std::result::Result<T, E>;
