//! # schemagen
//!
//! **schemagen** reads the schema of a live relational database and generates Rust
//! source for it: one model struct per table and, optionally, axum REST controllers
//! plus a router covering every table.
//!
//! ## Architecture
//!
//! The library is organized into these modules, leaf first:
//!
//! - **[`types`]** - Native column type → Rust type mapping
//! - **[`naming`]** - Singularization, pluralization and case conversion
//! - **[`schema`]** - Introspection of PostgreSQL, MySQL and SQLite schemas
//! - **[`generator`]** - Model builder, template renderer, formatter, sinks and the run pipeline
//! - **[`config`]** - `schemagen.toml` loading and validation
//! - **[`cli`]** - The `schemagen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(schemagen)
//!     participant Schema as schema::introspect
//!     participant Model as generator::build_struct
//!     participant Render as generator::Renderer
//!     participant Format as generator::format_source
//!     participant Sink as generator::Sink
//!
//!     CLI->>Schema: connect(&ConnectionConfig)
//!     Schema-->>CLI: Vec<TableDescriptor>
//!     loop every table
//!         CLI->>Model: build_struct(table, request)
//!         Model-->>CLI: StructSpec
//!     end
//!     CLI->>CLI: check_collisions(specs)
//!     loop every table
//!         CLI->>Render: model / controller template
//!         Render->>Format: raw text
//!         Format->>Sink: formatted source
//!     end
//!     CLI->>Render: router template (all struct names)
//!     Render->>Format: raw text
//!     Format->>Sink: api/router.rs
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! schemagen generate --engine sqlite --dbname app.db --out src --serde --rest
//! ```
//!
//! ```rust,ignore
//! use schemagen::generator::{FsSink, GenerationRequest, Generator, TemplateSet};
//! use schemagen::schema::ConnectionConfig;
//!
//! let mut sink = FsSink::new("src");
//! let report = Generator::new(GenerationRequest::default(), TemplateSet::default())
//!     .run(&ConnectionConfig::sqlite("app.db"), &mut sink)?;
//! println!("generated {:?}", report.structs);
//! ```
//!
//! ## Error Handling
//!
//! Every stage reports a [`GenError`]. The pipeline stops at the first one and
//! wraps it in a [`generator::Failure`] naming the stage. Nothing is retried.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod schema;
pub mod types;

pub use error::{GenError, Result};
pub use generator::{build_struct, GenerationRequest, Generator, StructSpec};
pub use schema::{connect, introspect, ConnectionConfig, Engine, TableDescriptor};
pub use types::{map_type, NullableTypeFamily};
