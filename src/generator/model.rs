//! Builds language-neutral struct descriptions from introspected tables.
//!
//! [`build_struct`] is a pure function of its inputs: the same table and
//! request always produce the same [`StructSpec`], which is what makes
//! regeneration byte-stable.

use super::GenerationRequest;
use crate::error::{GenError, Result};
use crate::naming::{singularize, to_pascal_case, to_snake_case};
use crate::schema::{ColumnDescriptor, TableDescriptor};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static",
    "struct", "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

// Keywords that cannot be written as raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// One generated struct field, derived 1:1 from a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// PascalCase name of the column (`user_id` → `UserId`)
    pub field_name: String,
    /// Rust identifier the field is declared with (`user_id`, `r#type`)
    pub ident: String,
    /// Rust type, nullable-wrapped when the column is nullable
    pub field_type: String,
    /// Source column name
    pub column_name: String,
    /// Native type as reported by the database
    pub native_type: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
    /// Declared length of character columns
    pub max_length: Option<u32>,
    /// Column default, collapsed to a single line
    pub default_value: Option<String>,
    /// `serde(rename = "...")`, when serialization annotations are requested
    pub serialization_tag: Option<String>,
    /// `sea_orm(...)`, when ORM annotations are requested
    pub orm_tag: Option<String>,
}

/// A foreign key as seen from the generated struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    /// Referencing column
    pub column: String,
    /// Identifier of the referencing field
    pub field: String,
    /// Referenced table
    pub referenced_table: String,
    /// Struct generated for the referenced table
    pub referenced_struct: String,
    /// Referenced column, when the engine names it
    pub referenced_column: Option<String>,
}

/// One generated type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructSpec {
    /// PascalCase singular type name
    pub struct_name: String,
    /// Originating table
    pub table_name: String,
    /// Module identifier the struct lives in (`order_item`, `r#type`)
    pub module: String,
    /// Output file stem: the module without `r#` (`order_item`, `type`)
    pub file_stem: String,
    /// Fields in column order
    pub fields: Vec<FieldSpec>,
    /// Derive macros, in declaration order
    pub derives: Vec<String>,
    /// Struct-level attributes without the surrounding `#[...]`
    pub attributes: Vec<String>,
    /// Sorted `use` paths the struct needs
    pub imports: Vec<String>,
    /// Outgoing foreign keys
    pub relations: Vec<Relation>,
}

/// Whether `s` is a keyword that needs the `r#` prefix to be an identifier.
pub(crate) fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Whether `s` is one of the keywords that cannot be an identifier at all.
pub(crate) fn is_path_keyword(s: &str) -> bool {
    PATH_KEYWORDS.contains(&s)
}

/// Escape `name` so it can be used as a Rust identifier.
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and
/// keywords are written as raw identifiers.
pub fn sanitize_identifier(name: &str) -> String {
    let mut s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() || s == "_" {
        return "unnamed".to_string();
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    if is_path_keyword(&s) {
        s.push('_');
        s
    } else if is_keyword(&s) {
        format!("r#{s}")
    } else {
        s
    }
}

/// Struct name for `table`: the configured override, or
/// `singularize(to_pascal_case(table))`.
pub fn struct_name(table: &str, overrides: &HashMap<String, String>) -> String {
    match overrides.get(table) {
        Some(name) => name.clone(),
        None => sanitize_identifier(&singularize(&to_pascal_case(table))),
    }
}

/// Module identifier for `table`: `to_snake_case(singularize(table))`, escaped.
pub fn module_name(table: &str) -> String {
    sanitize_identifier(&to_snake_case(&singularize(table)))
}

/// File stem for `table`.
///
/// Always the module identifier without its `r#` prefix, which is the file
/// `pub mod <module>;` resolves to.
pub fn file_stem(table: &str) -> String {
    let module = module_name(table);
    module.strip_prefix("r#").unwrap_or(&module).to_string()
}

fn quoted(s: &str) -> String {
    format!("{s:?}")
}

fn orm_tag(column: &ColumnDescriptor) -> String {
    let mut parts = Vec::with_capacity(3);
    if column.is_primary_key {
        parts.push("primary_key".to_string());
    }
    parts.push(format!("column_name = {}", quoted(&column.name)));
    if column.nullable {
        parts.push("nullable".to_string());
    }
    format!("sea_orm({})", parts.join(", "))
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the [`StructSpec`] for one table.
///
/// # Errors
///
/// - [`GenError::UnsupportedType`] when a column's native type has no mapping
/// - [`GenError::NameCollision`] when two columns derive the same field identifier
pub fn build_struct(table: &TableDescriptor, request: &GenerationRequest) -> Result<StructSpec> {
    let mapper = request.type_mapper();
    let mut fields = Vec::with_capacity(table.columns.len());
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut imports = BTreeSet::new();

    for column in &table.columns {
        let mapped = mapper
            .map(&column.native_type, column.nullable)
            .map_err(|u| GenError::UnsupportedType {
                table: table.name.clone(),
                column: column.name.clone(),
                native_type: u.native_type,
                reason: u.reason,
            })?;
        if let Some(import) = mapped.import {
            imports.insert(format!("{}::nullable::{import}", request.package_name));
        }

        let ident = sanitize_identifier(&to_snake_case(&column.name));
        if let Some(first) = seen.insert(ident.clone(), &column.name) {
            return Err(GenError::NameCollision {
                kind: "field",
                name: ident,
                first: format!("{}.{first}", table.name),
                second: format!("{}.{}", table.name, column.name),
            });
        }

        fields.push(FieldSpec {
            field_name: to_pascal_case(&column.name),
            ident,
            field_type: mapped.rust_type,
            column_name: column.name.clone(),
            native_type: column.native_type.clone(),
            nullable: column.nullable,
            primary_key: column.is_primary_key,
            max_length: column.max_length,
            default_value: column.default_value.as_deref().map(single_line),
            serialization_tag: request
                .serialization_annotation
                .then(|| format!("serde(rename = {})", quoted(&column.name))),
            orm_tag: request.orm_annotation.then(|| orm_tag(column)),
        });
    }

    let mut derives: Vec<String> = ["Debug", "Clone", "PartialEq"]
        .iter()
        .map(|d| d.to_string())
        .collect();
    if request.serialization_annotation {
        derives.push("serde::Serialize".to_string());
        derives.push("serde::Deserialize".to_string());
    }

    let attributes = if request.orm_annotation {
        vec![format!("sea_orm(table_name = {})", quoted(&table.name))]
    } else {
        Vec::new()
    };

    let relations = table
        .foreign_keys
        .iter()
        .map(|fk| Relation {
            column: fk.column.clone(),
            field: sanitize_identifier(&to_snake_case(&fk.column)),
            referenced_table: fk.referenced_table.clone(),
            referenced_struct: struct_name(&fk.referenced_table, &request.name_overrides),
            referenced_column: fk.referenced_column.clone(),
        })
        .collect();

    Ok(StructSpec {
        struct_name: struct_name(&table.name, &request.name_overrides),
        table_name: table.name.clone(),
        module: module_name(&table.name),
        file_stem: file_stem(&table.name),
        fields,
        derives,
        attributes,
        imports: imports.into_iter().collect(),
        relations,
    })
}

/// Fail when two specs share a struct name or an output file.
///
/// `mod` is always taken by the module index; `router` is taken in `api/`
/// when REST artifacts are generated.
pub fn check_collisions(specs: &[StructSpec], rest: bool) -> Result<()> {
    let mut structs: HashMap<&str, &str> = HashMap::new();
    let mut stems: HashMap<&str, &str> = HashMap::new();
    for spec in specs {
        if let Some(first) = structs.insert(&spec.struct_name, &spec.table_name) {
            return Err(GenError::NameCollision {
                kind: "struct",
                name: spec.struct_name.clone(),
                first: first.to_string(),
                second: spec.table_name.clone(),
            });
        }
        let reserved = match spec.file_stem.as_str() {
            "mod" => Some("module index"),
            "router" if rest => Some("router"),
            _ => None,
        };
        if let Some(reserved) = reserved {
            return Err(GenError::NameCollision {
                kind: "file",
                name: spec.file_stem.clone(),
                first: format!("generated {reserved}"),
                second: spec.table_name.clone(),
            });
        }
        if let Some(first) = stems.insert(&spec.file_stem, &spec.table_name) {
            return Err(GenError::NameCollision {
                kind: "file",
                name: spec.file_stem.clone(),
                first: first.to_string(),
                second: spec.table_name.clone(),
            });
        }
    }
    Ok(())
}
