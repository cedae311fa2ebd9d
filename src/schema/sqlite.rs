use super::{ColumnDescriptor, ConnectionConfig, Engine, ForeignKey, SchemaSource};
use crate::error::{GenError, Result};
use crate::types::NativeType;
use rusqlite::{Connection, OpenFlags};

const TABLES: &str = "
    SELECT name FROM sqlite_master
    WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
    ORDER BY name";

const COLUMNS: &str = r#"
    SELECT name, type, "notnull", dflt_value, pk
    FROM pragma_table_info(?1)
    ORDER BY cid"#;

const FOREIGN_KEYS: &str = r#"
    SELECT "from", "table", "to"
    FROM pragma_foreign_key_list(?1)
    ORDER BY id, seq"#;

/// SQLite metadata via `sqlite_master` and the table-valued pragmas.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open the database file named by `config.url` or `config.dbname` read-only.
    ///
    /// A missing file is a connection error rather than a new empty database.
    pub fn open(config: &ConnectionConfig) -> std::result::Result<Self, rusqlite::Error> {
        let path = config
            .url
            .as_deref()
            .or(config.dbname.as_deref())
            .unwrap_or_default();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        SqliteSource { conn }
    }
}

const INTEGER_TOKENS: &[&str] = &[
    "int", "integer", "tinyint", "smallint", "mediumint", "bigint", "int2", "int8",
];

const REAL_TOKENS: &[&str] = &["real", "float", "double", "double precision"];

/// The declared type rewritten to the width SQLite actually stores.
///
/// Integer columns always hold 8-byte values and floating columns 8-byte
/// doubles, whatever width the DDL spells out. Other declarations pass through.
fn storage_type(declared: &str) -> String {
    let ty = NativeType::parse(declared);
    let token = ty.token.strip_suffix(" unsigned").unwrap_or(&ty.token);
    if INTEGER_TOKENS.contains(&token) {
        "bigint".to_string()
    } else if REAL_TOKENS.contains(&token) {
        "float8".to_string()
    } else {
        declared.to_string()
    }
}

fn max_length(declared: &str) -> Option<u32> {
    let ty = NativeType::parse(declared);
    if ty.token.contains("char") || ty.token == "text" || ty.token == "clob" {
        ty.length()
    } else {
        None
    }
}

impl SchemaSource for SqliteSource {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        let read = |conn: &Connection| -> rusqlite::Result<Vec<String>> {
            let mut stmt = conn.prepare(TABLES)?;
            let names = stmt.query_map([], |row| row.get(0))?;
            names.collect()
        };
        read(&self.conn).map_err(|e| GenError::schema_read("listing tables", e))
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let read = |conn: &Connection| -> rusqlite::Result<Vec<ColumnDescriptor>> {
            let mut stmt = conn.prepare(COLUMNS)?;
            let columns = stmt.query_map([table], |row| {
                let declared: Option<String> = row.get(1)?;
                let declared = declared.unwrap_or_default();
                let not_null: bool = row.get(2)?;
                let pk: i64 = row.get(4)?;
                Ok(ColumnDescriptor {
                    name: row.get(0)?,
                    max_length: max_length(&declared),
                    native_type: storage_type(&declared),
                    // rowid aliases and other key columns never hold NULL in practice
                    nullable: !not_null && pk == 0,
                    is_primary_key: pk > 0,
                    default_value: row.get(3)?,
                })
            })?;
            columns.collect()
        };
        read(&self.conn)
            .map_err(|e| GenError::schema_read(&format!("reading columns of `{table}`"), e))
    }

    fn foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKey>> {
        let read = |conn: &Connection| -> rusqlite::Result<Vec<ForeignKey>> {
            let mut stmt = conn.prepare(FOREIGN_KEYS)?;
            let keys = stmt.query_map([table], |row| {
                Ok(ForeignKey {
                    column: row.get(0)?,
                    referenced_table: row.get(1)?,
                    referenced_column: row.get(2)?,
                })
            })?;
            keys.collect()
        };
        read(&self.conn)
            .map_err(|e| GenError::schema_read(&format!("reading foreign keys of `{table}`"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_only_for_character_types() {
        assert_eq!(max_length("VARCHAR(255)"), Some(255));
        assert_eq!(max_length("character(12)"), Some(12));
        assert_eq!(max_length("NUMERIC(10,2)"), None);
        assert_eq!(max_length("TEXT"), None);
    }

    #[test]
    fn test_storage_type_uses_sqlite_widths() {
        assert_eq!(storage_type("INTEGER"), "bigint");
        assert_eq!(storage_type("INT"), "bigint");
        assert_eq!(storage_type("smallint"), "bigint");
        assert_eq!(storage_type("INT UNSIGNED"), "bigint");
        assert_eq!(storage_type("REAL"), "float8");
        assert_eq!(storage_type("FLOAT"), "float8");
        assert_eq!(storage_type("DOUBLE PRECISION"), "float8");
        assert_eq!(storage_type("NUMERIC(10,2)"), "NUMERIC(10,2)");
        assert_eq!(storage_type("VARCHAR(255)"), "VARCHAR(255)");
        assert_eq!(storage_type("GEOMETRY"), "GEOMETRY");
        assert_eq!(storage_type(""), "");
    }
}
