//! # CLI Module
//!
//! Command-line interface for the `schemagen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Introspect a database and write models (and optionally controllers and a
//! router) for its tables:
//!
//! ```bash
//! schemagen generate --engine sqlite --dbname app.db --out src --serde --rest
//! schemagen generate --engine postgres --url postgres://app@localhost/shop \
//!     --schema sales --package shop_api --nullable extended-nullable-types
//! ```
//!
//! Connection flags: `--engine`, `--url` (or `SCHEMAGEN_DATABASE_URL`), `--host`,
//! `--port`, `--user`, `--password` (or `SCHEMAGEN_DATABASE_PASSWORD`), `--dbname`,
//! `--schema`.
//!
//! Generation flags: `--package`, `--serde`, `--orm`/`--no-orm`, `--nullable`,
//! `--rest`, `--tables`, `--out`, `--config`, `--model-template`,
//! `--controller-template`, `--router-template`, `--approximate-decimals`,
//! `--dry-run`. Flags override `schemagen.toml`.
//!
//! ### `types`
//!
//! Print the type mapping table:
//!
//! ```bash
//! schemagen types --nullable extended-nullable-types
//! ```

mod commands;


pub use commands::{
    format_type_table, run_cli, run_generate, type_table, Cli, Commands, GenerateArgs,
    GeneratePlan,
};
