use super::{ColumnDescriptor, ConnectionConfig, Engine, ForeignKey, SchemaSource};
use crate::error::{GenError, Result};
use postgres::{Client, NoTls};

const TABLES: &str = "
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema::text = $1 AND table_type IN ('BASE TABLE', 'VIEW')
    ORDER BY table_name";

const COLUMNS: &str = "
    SELECT c.column_name::text,
           c.udt_name::text,
           c.is_nullable::text,
           c.column_default::text,
           c.character_maximum_length::int4,
           c.numeric_precision::int4,
           c.numeric_scale::int4,
           EXISTS (
               SELECT 1
               FROM information_schema.table_constraints tc
               JOIN information_schema.key_column_usage kcu
                 ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
                AND tc.table_name = kcu.table_name
               WHERE tc.constraint_type = 'PRIMARY KEY'
                 AND tc.table_schema = c.table_schema
                 AND tc.table_name = c.table_name
                 AND kcu.column_name = c.column_name
           )
    FROM information_schema.columns c
    WHERE c.table_schema::text = $1 AND c.table_name::text = $2
    ORDER BY c.ordinal_position";

// Each referencing column is paired with the referenced column at the same
// position of the unique constraint, so composite keys yield one row per column.
const FOREIGN_KEYS: &str = "
    SELECT kcu.column_name::text, rkcu.table_name::text, rkcu.column_name::text
    FROM information_schema.referential_constraints rc
    JOIN information_schema.key_column_usage kcu
      ON kcu.constraint_schema = rc.constraint_schema
     AND kcu.constraint_name = rc.constraint_name
    JOIN information_schema.key_column_usage rkcu
      ON rkcu.constraint_schema = rc.unique_constraint_schema
     AND rkcu.constraint_name = rc.unique_constraint_name
     AND rkcu.ordinal_position = kcu.position_in_unique_constraint
    WHERE kcu.table_schema::text = $1 AND kcu.table_name::text = $2
    ORDER BY kcu.constraint_name, kcu.ordinal_position";

/// PostgreSQL metadata via `information_schema`.
pub struct PostgresSource {
    client: Client,
    schema: String,
}

impl PostgresSource {
    /// Connect using the config's URL or key/value parameters.
    pub fn connect(config: &ConnectionConfig) -> std::result::Result<Self, postgres::Error> {
        let client = Client::connect(&config.postgres_params(), NoTls)?;
        Ok(PostgresSource {
            client,
            schema: config.schema.clone().unwrap_or_else(|| "public".to_string()),
        })
    }
}

/// `numeric` with declared precision keeps it in the token (`numeric(10,2)`),
/// as does `bit` its length (`bit(8)`).
fn native_type(
    udt: &str,
    length: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> String {
    match (udt, length, precision) {
        ("numeric", _, Some(p)) => format!("numeric({p},{})", scale.unwrap_or(0)),
        ("bit", Some(n), _) => format!("bit({n})"),
        _ => udt.to_string(),
    }
}

impl SchemaSource for PostgresSource {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(TABLES, &[&self.schema])
            .map_err(|e| GenError::schema_read("listing tables", e))?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .client
            .query(COLUMNS, &[&self.schema, &table])
            .map_err(|e| GenError::schema_read(&format!("reading columns of `{table}`"), e))?;
        Ok(rows
            .iter()
            .map(|r| {
                let udt: String = r.get(1);
                let nullable: String = r.get(2);
                let max_length: Option<i32> = r.get(4);
                ColumnDescriptor {
                    name: r.get(0),
                    native_type: native_type(&udt, max_length, r.get(5), r.get(6)),
                    nullable: nullable == "YES",
                    is_primary_key: r.get(7),
                    max_length: max_length.and_then(|l| u32::try_from(l).ok()),
                    default_value: r.get(3),
                }
            })
            .collect())
    }

    fn foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKey>> {
        let rows = self
            .client
            .query(FOREIGN_KEYS, &[&self.schema, &table])
            .map_err(|e| GenError::schema_read(&format!("reading foreign keys of `{table}`"), e))?;
        Ok(rows
            .iter()
            .map(|r| ForeignKey {
                column: r.get(0),
                referenced_table: r.get(1),
                referenced_column: Some(r.get(2)),
            })
            .collect())
    }
}
