//! # Type Mapping
//!
//! Maps a database column's native type token plus its nullability to the Rust
//! type used for the generated struct field.
//!
//! Native tokens are normalized before lookup:
//!
//! ```text
//! "NUMERIC(10,2)"               → "numeric"          (precision 10, scale 2)
//! "int(11) unsigned zerofill"   → "int unsigned"
//! "timestamp(6) with time zone" → "timestamp with time zone"
//! ```
//!
//! Unknown tokens never fall back to a default: silently mapping a `geometry`
//! column to `String` would corrupt every row read through the generated type.
//! The same holds for widths: an unbounded `numeric` or a multi-bit `bit(8)`
//! never lands in a type narrower than the column.

use serde::{Deserialize, Serialize};

/// How nullable columns are represented in generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NullableTypeFamily {
    /// No dedicated wrapper family; nullable columns use `Option<T>`
    None,
    /// `Option<T>`
    #[default]
    BasicWrapper,
    /// Dedicated composites (`NullI32`, `NullString`, ...) from `<package>::nullable`
    ExtendedNullableTypes,
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    /// Normalized native tokens that select this row
    pub tokens: &'static [&'static str],
    /// Rust type for non-nullable columns
    pub rust: &'static str,
    /// Dedicated nullable composite under [`NullableTypeFamily::ExtendedNullableTypes`]
    pub extended_nullable: &'static str,
}

const fn rule(
    tokens: &'static [&'static str],
    rust: &'static str,
    extended_nullable: &'static str,
) -> TypeRule {
    TypeRule {
        tokens,
        rust,
        extended_nullable,
    }
}

/// Largest precision `rust_decimal::Decimal` represents exactly.
pub const MAX_DECIMAL_PRECISION: u32 = 28;

const DECIMAL: TypeRule = rule(
    &["decimal", "numeric", "dec", "fixed", "money"],
    "rust_decimal::Decimal",
    "NullDecimal",
);

// `real` is an 8-byte double in SQLite and MySQL; PostgreSQL reports its
// 4-byte `real` as `float4`.
const F64: TypeRule = rule(
    &["real", "double", "double precision", "float8"],
    "f64",
    "NullF64",
);

const BOOL: TypeRule = rule(&["bool", "boolean", "bit"], "bool", "NullBool");

const BYTES: TypeRule = rule(
    &[
        "bytea",
        "blob",
        "tinyblob",
        "mediumblob",
        "longblob",
        "binary",
        "varbinary",
    ],
    "Vec<u8>",
    "NullBytes",
);

/// The supported native types, grouped by family.
pub const TYPE_RULES: &[TypeRule] = &[
    // integer
    rule(&["tinyint", "int1"], "i8", "NullI8"),
    rule(
        &["smallint", "int2", "smallserial", "serial2", "year"],
        "i16",
        "NullI16",
    ),
    rule(
        &["int", "integer", "int4", "mediumint", "int3", "serial", "serial4"],
        "i32",
        "NullI32",
    ),
    rule(&["bigint", "int8", "bigserial", "serial8"], "i64", "NullI64"),
    rule(&["tinyint unsigned"], "u8", "NullU8"),
    rule(&["smallint unsigned"], "u16", "NullU16"),
    rule(
        &["int unsigned", "integer unsigned", "mediumint unsigned"],
        "u32",
        "NullU32",
    ),
    rule(&["bigint unsigned"], "u64", "NullU64"),
    // floating point
    rule(&["float4", "float"], "f32", "NullF32"),
    F64,
    // decimal
    DECIMAL,
    // text
    rule(
        &[
            "varchar",
            "character varying",
            "char",
            "character",
            "bpchar",
            "nvarchar",
            "nchar",
            "varchar2",
            "text",
            "tinytext",
            "mediumtext",
            "longtext",
            "clob",
            "citext",
            "name",
            "enum",
            "set",
        ],
        "String",
        "NullString",
    ),
    // boolean
    BOOL,
    // temporal
    rule(&["date"], "chrono::NaiveDate", "NullDate"),
    rule(
        &["time", "time without time zone"],
        "chrono::NaiveTime",
        "NullTime",
    ),
    rule(
        &["timestamp", "timestamp without time zone", "datetime"],
        "chrono::NaiveDateTime",
        "NullDateTime",
    ),
    rule(
        &["timestamptz", "timestamp with time zone"],
        "chrono::DateTime<chrono::Utc>",
        "NullDateTimeUtc",
    ),
    // binary
    BYTES,
    // structured
    rule(&["uuid"], "uuid::Uuid", "NullUuid"),
    rule(&["json", "jsonb"], "serde_json::Value", "NullJson"),
];

/// A native type token split into its lookup key and numeric arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    /// Lowercased token with argument lists removed (`numeric`, `int unsigned`)
    pub token: String,
    /// Numeric arguments from the first argument list (`[10, 2]` for `numeric(10,2)`)
    pub args: Vec<u32>,
}

impl NativeType {
    /// Normalize a native type as reported by the database.
    pub fn parse(native: &str) -> Self {
        let mut token = String::with_capacity(native.len());
        let mut args = Vec::new();
        let mut depth = 0usize;
        let mut arg_text = String::new();
        let mut first_list = true;
        for c in native.chars() {
            match c {
                '(' => {
                    depth += 1;
                    token.push(' ');
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        if first_list {
                            args = arg_text
                                .split(',')
                                .filter_map(|a| a.trim().parse().ok())
                                .collect();
                            first_list = false;
                        }
                        arg_text.clear();
                    }
                }
                _ if depth > 0 => arg_text.push(c),
                _ => token.extend(c.to_lowercase()),
            }
        }
        let token = token
            .split_whitespace()
            .filter(|w| *w != "zerofill")
            .collect::<Vec<_>>()
            .join(" ");
        NativeType { token, args }
    }

    /// Declared length of character types (`varchar(255)` → 255).
    pub fn length(&self) -> Option<u32> {
        self.args.first().copied()
    }
}

/// Why a native type could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    /// The offending native type as given
    pub native_type: String,
    /// Human-readable reason
    pub reason: String,
}

/// Mapping policy for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMapper {
    /// Nullable representation
    pub family: NullableTypeFamily,
    /// Allow decimals wider than [`MAX_DECIMAL_PRECISION`], or declared without
    /// a precision, to map to `f64`
    pub approximate_decimals: bool,
}

/// The Rust type chosen for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Full type expression for the field (`i32`, `Option<String>`, `NullI32`)
    pub rust_type: String,
    /// Name to import from `<package>::nullable`, for extended nullable types
    pub import: Option<&'static str>,
}

fn lookup(token: &str) -> Option<&'static TypeRule> {
    TYPE_RULES.iter().find(|r| r.tokens.contains(&token))
}

impl TypeMapper {
    /// Create a mapper for the given nullable family.
    pub fn new(family: NullableTypeFamily) -> Self {
        TypeMapper {
            family,
            approximate_decimals: false,
        }
    }

    /// Map a native type and nullability to a Rust type.
    pub fn map(&self, native: &str, nullable: bool) -> Result<MappedType, Unsupported> {
        let parsed = NativeType::parse(native);
        let unsupported = |reason: String| Unsupported {
            native_type: native.to_string(),
            reason,
        };
        if parsed.token.is_empty() {
            return Err(unsupported("column has no declared type".to_string()));
        }
        let rule = lookup(&parsed.token)
            .or_else(|| parsed.token.strip_suffix(" unsigned").and_then(lookup))
            .ok_or_else(|| {
            unsupported(format!(
                "no mapping for `{}`; extend the type table",
                parsed.token
            ))
        })?;
        let rule = if rule.rust == DECIMAL.rust {
            self.check_decimal(&parsed).map_err(unsupported)?
        } else if parsed.token == "bit" {
            check_bit(&parsed)
        } else {
            rule
        };
        Ok(self.wrap(rule, nullable))
    }

    fn check_decimal(&self, parsed: &NativeType) -> Result<&'static TypeRule, String> {
        match parsed.args.first() {
            Some(&precision) if precision > MAX_DECIMAL_PRECISION => {
                if self.approximate_decimals {
                    Ok(&F64)
                } else {
                    Err(format!(
                        "precision {precision} exceeds the {MAX_DECIMAL_PRECISION} digits of \
                         rust_decimal::Decimal; pass --approximate-decimals to accept f64"
                    ))
                }
            }
            Some(_) => Ok(&DECIMAL),
            // fixed two-digit scale, at most 19 digits
            None if parsed.token == "money" => Ok(&DECIMAL),
            None if self.approximate_decimals => Ok(&F64),
            None => Err(format!(
                "`{}` without a precision is unbounded; declare one of at most \
                 {MAX_DECIMAL_PRECISION} digits or pass --approximate-decimals to accept f64",
                parsed.token
            )),
        }
    }

    /// The type used for non-nullable columns of `rule`, and for nullable ones.
    pub fn describe(&self, rule: &'static TypeRule) -> (MappedType, MappedType) {
        (self.wrap(rule, false), self.wrap(rule, true))
    }

    fn wrap(&self, rule: &'static TypeRule, nullable: bool) -> MappedType {
        if !nullable {
            return MappedType {
                rust_type: rule.rust.to_string(),
                import: None,
            };
        }
        match self.family {
            NullableTypeFamily::None | NullableTypeFamily::BasicWrapper => MappedType {
                rust_type: format!("Option<{}>", rule.rust),
                import: None,
            },
            NullableTypeFamily::ExtendedNullableTypes => MappedType {
                rust_type: rule.extended_nullable.to_string(),
                import: Some(rule.extended_nullable),
            },
        }
    }
}

/// A single bit is a flag; wider bit strings keep every bit as bytes.
fn check_bit(parsed: &NativeType) -> &'static TypeRule {
    match parsed.length() {
        None | Some(0) | Some(1) => &BOOL,
        Some(_) => &BYTES,
    }
}

/// Map `native` with default decimal policy.
pub fn map_type(
    native: &str,
    nullable: bool,
    family: NullableTypeFamily,
) -> Result<String, Unsupported> {
    TypeMapper::new(family)
        .map(native, nullable)
        .map(|m| m.rust_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_type() {
        assert_eq!(
            NativeType::parse("NUMERIC(10,2)"),
            NativeType {
                token: "numeric".into(),
                args: vec![10, 2]
            }
        );
        assert_eq!(NativeType::parse("int(11) unsigned zerofill").token, "int unsigned");
        assert_eq!(
            NativeType::parse("timestamp(6) with time zone").token,
            "timestamp with time zone"
        );
        assert_eq!(NativeType::parse("enum('a','b')").token, "enum");
        assert_eq!(NativeType::parse("varchar(255)").length(), Some(255));
        assert_eq!(NativeType::parse("text").length(), None);
    }

    #[test]
    fn test_every_supported_token_maps() {
        for family in [
            NullableTypeFamily::None,
            NullableTypeFamily::BasicWrapper,
            NullableTypeFamily::ExtendedNullableTypes,
        ] {
            for rule in TYPE_RULES {
                for token in rule.tokens {
                    let native = if rule.rust == DECIMAL.rust {
                        format!("{token}(10,2)")
                    } else {
                        token.to_string()
                    };
                    let plain = map_type(&native, false, family).unwrap();
                    let nullable = map_type(&native, true, family).unwrap();
                    assert!(!plain.is_empty(), "{token}");
                    assert_ne!(plain, nullable, "{token} under {family:?}");
                }
            }
        }
    }

    #[test]
    fn test_scenario_types() {
        let f = NullableTypeFamily::BasicWrapper;
        assert_eq!(map_type("int", false, f).unwrap(), "i32");
        assert_eq!(map_type("varchar(255)", false, f).unwrap(), "String");
        assert_eq!(map_type("int", true, f).unwrap(), "Option<i32>");
        assert_eq!(map_type("INT UNSIGNED", false, f).unwrap(), "u32");
        assert_eq!(
            map_type("decimal(10,2) unsigned", false, f).unwrap(),
            "rust_decimal::Decimal"
        );
        assert_eq!(
            map_type("timestamp with time zone", true, f).unwrap(),
            "Option<chrono::DateTime<chrono::Utc>>"
        );
    }

    #[test]
    fn test_extended_nullable_types() {
        let mapper = TypeMapper::new(NullableTypeFamily::ExtendedNullableTypes);
        let mapped = mapper.map("int4", true).unwrap();
        assert_eq!(mapped.rust_type, "NullI32");
        assert_eq!(mapped.import, Some("NullI32"));
        let plain = mapper.map("int4", false).unwrap();
        assert_eq!(plain.rust_type, "i32");
        assert_eq!(plain.import, None);
    }

    #[test]
    fn test_unknown_tokens_fail() {
        for token in ["geometry", "_int4", "int[]", "", "tsvector", "interval"] {
            let err = map_type(token, false, NullableTypeFamily::None).unwrap_err();
            assert_eq!(err.native_type, token);
        }
    }

    #[test]
    fn test_decimal_precision() {
        let f = NullableTypeFamily::BasicWrapper;
        assert_eq!(
            map_type("numeric(10,2)", false, f).unwrap(),
            "rust_decimal::Decimal"
        );
        assert_eq!(map_type("money", false, f).unwrap(), "rust_decimal::Decimal");
        let err = map_type("numeric(40,2)", false, f).unwrap_err();
        assert!(err.reason.contains("precision 40"));

        let approx = TypeMapper {
            family: f,
            approximate_decimals: true,
        };
        assert_eq!(approx.map("numeric(40,2)", true).unwrap().rust_type, "Option<f64>");
        assert_eq!(approx.map("numeric", false).unwrap().rust_type, "f64");
    }

    #[test]
    fn test_unbounded_numeric_fails() {
        let f = NullableTypeFamily::BasicWrapper;
        for native in ["numeric", "NUMERIC", "decimal"] {
            let err = map_type(native, false, f).unwrap_err();
            assert_eq!(err.native_type, native);
            assert!(err.reason.contains("without a precision"), "{}", err.reason);
        }
    }

    #[test]
    fn test_floating_point_widths() {
        let f = NullableTypeFamily::BasicWrapper;
        assert_eq!(map_type("real", false, f).unwrap(), "f64");
        assert_eq!(map_type("REAL", true, f).unwrap(), "Option<f64>");
        assert_eq!(map_type("float8", false, f).unwrap(), "f64");
        assert_eq!(map_type("float4", false, f).unwrap(), "f32");
    }

    #[test]
    fn test_bit_width() {
        let f = NullableTypeFamily::BasicWrapper;
        assert_eq!(map_type("bit", false, f).unwrap(), "bool");
        assert_eq!(map_type("bit(1)", true, f).unwrap(), "Option<bool>");
        assert_eq!(map_type("bit(8)", false, f).unwrap(), "Vec<u8>");
        assert_eq!(map_type("BIT(64)", true, f).unwrap(), "Option<Vec<u8>>");
    }
}
