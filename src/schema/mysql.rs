use super::{ColumnDescriptor, ConnectionConfig, Engine, ForeignKey, SchemaSource};
use crate::error::{GenError, Result};
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, OptsBuilder};

const TABLES: &str = "
    SELECT table_name
    FROM information_schema.tables
    WHERE table_schema = DATABASE()
    ORDER BY table_name";

const COLUMNS: &str = "
    SELECT column_name, column_type, is_nullable, column_key, column_default,
           character_maximum_length
    FROM information_schema.columns
    WHERE table_schema = DATABASE() AND table_name = ?
    ORDER BY ordinal_position";

const FOREIGN_KEYS: &str = "
    SELECT column_name, referenced_table_name, referenced_column_name
    FROM information_schema.key_column_usage
    WHERE table_schema = DATABASE() AND table_name = ?
      AND referenced_table_name IS NOT NULL
    ORDER BY constraint_name, ordinal_position";

type ColumnRow = (String, String, String, String, Option<String>, Option<u64>);

/// MySQL/MariaDB metadata via `information_schema` of the selected database.
pub struct MySqlSource {
    conn: Conn,
}

impl MySqlSource {
    /// Connect using the config's URL or its individual parts.
    pub fn connect(config: &ConnectionConfig) -> std::result::Result<Self, mysql::Error> {
        let opts = match &config.url {
            Some(url) => Opts::from_url(url)?,
            None => OptsBuilder::new()
                .ip_or_hostname(config.host.clone())
                .tcp_port(config.port.unwrap_or(3306))
                .user(config.user.clone())
                .pass(config.password.clone())
                .db_name(config.dbname.clone())
                .into(),
        };
        Ok(MySqlSource {
            conn: Conn::new(opts)?,
        })
    }
}

fn column(row: ColumnRow) -> ColumnDescriptor {
    let (name, column_type, is_nullable, column_key, default_value, max_length) = row;
    ColumnDescriptor {
        name,
        native_type: column_type,
        nullable: is_nullable.eq_ignore_ascii_case("YES"),
        is_primary_key: column_key == "PRI",
        max_length: max_length.and_then(|l| u32::try_from(l).ok()),
        default_value,
    }
}

impl SchemaSource for MySqlSource {
    fn engine(&self) -> Engine {
        Engine::Mysql
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        self.conn
            .query(TABLES)
            .map_err(|e| GenError::schema_read("listing tables", e))
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows: Vec<ColumnRow> = self
            .conn
            .exec(COLUMNS, (table,))
            .map_err(|e| GenError::schema_read(&format!("reading columns of `{table}`"), e))?;
        Ok(rows.into_iter().map(column).collect())
    }

    fn foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKey>> {
        let rows: Vec<(String, String, String)> = self
            .conn
            .exec(FOREIGN_KEYS, (table,))
            .map_err(|e| GenError::schema_read(&format!("reading foreign keys of `{table}`"), e))?;
        Ok(rows
            .into_iter()
            .map(|(column, referenced_table, referenced_column)| ForeignKey {
                column,
                referenced_table,
                referenced_column: Some(referenced_column),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_row() {
        let col = column((
            "price".into(),
            "decimal(10,2) unsigned".into(),
            "NO".into(),
            String::new(),
            Some("0.00".into()),
            None,
        ));
        assert_eq!(col.native_type, "decimal(10,2) unsigned");
        assert!(!col.nullable);
        assert!(!col.is_primary_key);
        assert_eq!(col.default_value.as_deref(), Some("0.00"));

        let id = column(("id".into(), "int".into(), "NO".into(), "PRI".into(), None, None));
        assert!(id.is_primary_key);
    }
}
