//! Configuration file for generation runs.
//!
//! An optional `schemagen.toml` supplies defaults for every generation flag plus
//! the things that are awkward on a command line: per-table struct names and
//! template paths. Values given on the command line win over the file.
//!
//! ```toml
//! package = "my_app"
//! serde = true
//! nullable = "extended-nullable-types"
//! rest = true
//! tables = ["users", "orders"]
//!
//! [names]
//! tbl_usr = "User"
//!
//! [templates]
//! model = "templates/model.rs.j2"
//! ```

use crate::error::{GenError, Result};
use crate::generator::{is_keyword, is_path_keyword};
use crate::types::NullableTypeFamily;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "schemagen.toml";

/// Template file overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatePaths {
    /// Model template
    pub model: Option<PathBuf>,
    /// Controller template
    pub controller: Option<PathBuf>,
    /// Router template
    pub router: Option<PathBuf>,
}

/// Contents of `schemagen.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path prefix of the generated crate
    pub package: Option<String>,
    /// Output directory
    pub out: Option<PathBuf>,
    /// Serialization annotations
    pub serde: Option<bool>,
    /// ORM annotations
    pub orm: Option<bool>,
    /// Nullable type family
    pub nullable: Option<NullableTypeFamily>,
    /// REST controllers and router
    pub rest: Option<bool>,
    /// Map over-wide decimals to `f64`
    pub approximate_decimals: Option<bool>,
    /// Tables to generate; empty or absent means all
    #[serde(default)]
    pub tables: Vec<String>,
    /// Table name → struct name overrides
    #[serde(default)]
    pub names: HashMap<String, String>,
    /// Template file overrides
    #[serde(default)]
    pub templates: TemplatePaths,
}

impl FileConfig {
    /// Check values that TOML types alone cannot.
    pub fn validate(&self) -> Result<()> {
        if let Some(package) = &self.package {
            validate_package_path(package)?;
        }
        for (table, name) in &self.names {
            if !is_identifier(name) {
                return Err(GenError::Config(format!(
                    "struct name `{name}` for table `{table}` is not a Rust identifier"
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative template paths against the config file's directory.
    fn anchor(&mut self, base: &Path) {
        for path in [
            &mut self.templates.model,
            &mut self.templates.controller,
            &mut self.templates.router,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load a config file.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but cannot
/// be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| GenError::Config(format!("cannot read {}: {e}", path.display())))?;
    let mut config: FileConfig = toml::from_str(&contents)
        .map_err(|e| GenError::Config(format!("cannot parse {}: {e}", path.display())))?;
    config.validate()?;
    if let Some(base) = path.parent() {
        config.anchor(base);
    }
    Ok(Some(config))
}

/// The explicit path when given, otherwise [`DEFAULT_CONFIG_FILE`].
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    match explicit {
        Some(path) => match load_config(path)? {
            Some(config) => Ok(Some(config)),
            None => Err(GenError::Config(format!(
                "config file {} does not exist",
                path.display()
            ))),
        },
        None => load_config(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

fn is_identifier(s: &str) -> bool {
    let (raw, s) = match s.strip_prefix("r#") {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut chars = s.chars();
    let well_formed = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            s != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    well_formed && !is_path_keyword(s) && (raw || !is_keyword(s))
}

/// Check that `package` is a usable Rust path prefix (`crate`, `my_app`, `crate::db`).
pub fn validate_package_path(package: &str) -> Result<()> {
    let valid = !package.is_empty()
        && package.split("::").enumerate().all(|(i, segment)| {
            let leading_keyword = i == 0 && matches!(segment, "crate" | "self" | "super");
            leading_keyword || is_identifier(segment)
        });
    if valid {
        Ok(())
    } else {
        Err(GenError::Config(format!(
            "package `{package}` is not a Rust path"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("schemagen.toml")).unwrap(), None);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagen.toml");
        fs::write(
            &path,
            r#"
package = "my_app::db"
serde = true
nullable = "extended-nullable-types"
tables = ["users"]

[names]
tbl_usr = "User"

[templates]
model = "tpl/model.rs.j2"
router = "/abs/router.rs.j2"
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.package.as_deref(), Some("my_app::db"));
        assert_eq!(config.serde, Some(true));
        assert_eq!(config.orm, None);
        assert_eq!(
            config.nullable,
            Some(NullableTypeFamily::ExtendedNullableTypes)
        );
        assert_eq!(config.tables, ["users"]);
        assert_eq!(config.names["tbl_usr"], "User");
        assert_eq!(
            config.templates.model,
            Some(dir.path().join("tpl/model.rs.j2"))
        );
        assert_eq!(
            config.templates.router,
            Some(PathBuf::from("/abs/router.rs.j2"))
        );
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagen.toml");
        fs::write(&path, "serde = \"yes\"").unwrap();
        assert!(matches!(load_config(&path), Err(GenError::Config(_))));

        fs::write(&path, "unknown_key = 1").unwrap();
        assert!(matches!(load_config(&path), Err(GenError::Config(_))));

        fs::write(&path, "[names]\nusers = \"Not An Ident\"").unwrap();
        assert!(matches!(load_config(&path), Err(GenError::Config(_))));
    }

    #[test]
    fn test_package_paths() {
        for ok in ["crate", "my_app", "crate::db", "super::models", "r#async"] {
            assert!(validate_package_path(ok).is_ok(), "{ok}");
        }
        for bad in ["", "my-app", "crate::", "a::crate", "1app", "my app", "_", "crate::type", "Self"] {
            assert!(validate_package_path(bad).is_err(), "{bad}");
        }
    }
}
