//! # Generator Module
//!
//! Turns introspected tables into formatted Rust source: one model struct per
//! table and, on request, one REST controller per table plus a router over all
//! of them.
//!
//! ## Architecture
//!
//! ```text
//! TableDescriptor → build_struct → StructSpec → render → format → Sink
//!                                      │
//!                       all names ─────┴──→ router → format → Sink
//! ```
//!
//! 1. **Model Builder** ([`build_struct`]) - naming and type mapping, no I/O
//! 2. **Renderer** ([`Renderer`]) - minijinja templates with a fixed helper registry
//! 3. **Formatter** ([`format_source`]) - rejects output that does not parse as Rust
//! 4. **Sink** ([`Sink`]) - create-or-overwrite persistence
//!
//! [`Generator`] drives the stages and records which one failed.
//!
//! ## Generated Structure
//!
//! ```text
//! <out>/
//! ├── model/
//! │   ├── mod.rs
//! │   └── <table>.rs          # One struct per table
//! └── api/                    # Only with REST artifacts
//!     ├── mod.rs
//!     ├── router.rs           # Routes for every table
//!     └── <table>.rs          # One controller per table
//! ```
//!
//! Regeneration always overwrites; hand edits to generated files are lost.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemagen::generator::{FsSink, GenerationRequest, Generator, TemplateSet};
//! use schemagen::schema::ConnectionConfig;
//!
//! let request = GenerationRequest {
//!     generate_rest_artifacts: true,
//!     ..GenerationRequest::default()
//! };
//! let mut sink = FsSink::new("src");
//! let report = Generator::new(request, TemplateSet::default())
//!     .run(&ConnectionConfig::sqlite("app.db"), &mut sink)?;
//! ```

mod format;
mod model;
mod pipeline;
mod render;
mod sink;
mod templates;


pub use format::format_source;
pub use model::{
    build_struct, check_collisions, file_stem, module_name, sanitize_identifier, struct_name,
    FieldSpec, Relation, StructSpec,
};
pub(crate) use model::{is_keyword, is_path_keyword};
pub use pipeline::{Failure, Generator, RunReport, Stage};
pub use render::{render, Helper, HelperRegistry, Renderer};
pub use sink::{DryRunSink, FsSink, MemorySink, Sink};
pub use templates::{
    render_mod_rs, ControllerData, ModRsTemplateData, RouterData, RouterEntry, TemplateSet,
    DEFAULT_CONTROLLER_TEMPLATE, DEFAULT_MODEL_TEMPLATE, DEFAULT_ROUTER_TEMPLATE,
};

use crate::types::{NullableTypeFamily, TypeMapper};
use std::collections::HashMap;

/// Package name used in generated paths when none is configured.
pub const DEFAULT_PACKAGE: &str = "crate";

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Path prefix of the generated code's crate (`crate`, `my_app`)
    pub package_name: String,
    /// Add `serde` derives and per-field `rename` tags
    pub serialization_annotation: bool,
    /// Add `sea_orm` table and column attributes
    pub orm_annotation: bool,
    /// Representation of nullable columns
    pub nullable_type_family: NullableTypeFamily,
    /// Also emit controllers and the router
    pub generate_rest_artifacts: bool,
    /// Map decimals too wide for `rust_decimal`, or without a precision, to `f64` instead of failing
    pub approximate_decimals: bool,
    /// Table name → struct name, bypassing the derived name
    pub name_overrides: HashMap<String, String>,
    /// Restrict generation to these tables; empty means all
    pub tables: Vec<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            package_name: DEFAULT_PACKAGE.to_string(),
            serialization_annotation: false,
            orm_annotation: true,
            nullable_type_family: NullableTypeFamily::default(),
            generate_rest_artifacts: false,
            approximate_decimals: false,
            name_overrides: HashMap::new(),
            tables: Vec::new(),
        }
    }
}

impl GenerationRequest {
    /// Type mapper configured for this request.
    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper {
            family: self.nullable_type_family,
            approximate_decimals: self.approximate_decimals,
        }
    }
}
