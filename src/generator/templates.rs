use crate::error::{GenError, Result};
use askama::Template;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Built-in model template.
pub const DEFAULT_MODEL_TEMPLATE: &str = include_str!("../../templates/model.rs.j2");
/// Built-in controller template.
pub const DEFAULT_CONTROLLER_TEMPLATE: &str = include_str!("../../templates/controller.rs.j2");
/// Built-in router template.
pub const DEFAULT_ROUTER_TEMPLATE: &str = include_str!("../../templates/router.rs.j2");

/// Template data for generating mod.rs module declarations
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    /// What the modules hold (`models`, `controllers`)
    pub label: String,
    /// Module identifiers to declare, in order
    pub modules: Vec<String>,
}

/// Data handed to the controller template for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerData {
    /// Path prefix of the generated crate
    pub package_name: String,
    /// Model struct the controller serves
    pub struct_name: String,
    /// Source table
    pub table_name: String,
    /// Module identifier shared by the model and the controller
    pub module: String,
}

/// One table as seen by the router template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterEntry {
    /// Model struct name
    pub struct_name: String,
    /// Module identifier of model and controller
    pub module: String,
    /// Source table, used as the route path
    pub table_name: String,
}

/// Data handed to the router template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterData {
    /// Path prefix of the generated crate
    pub package_name: String,
    /// Every generated table, in introspection order
    pub entries: Vec<RouterEntry>,
}

/// Template sources for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    /// Model template source
    pub model: String,
    /// Controller template source
    pub controller: String,
    /// Router template source
    pub router: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        TemplateSet {
            model: DEFAULT_MODEL_TEMPLATE.to_string(),
            controller: DEFAULT_CONTROLLER_TEMPLATE.to_string(),
            router: DEFAULT_ROUTER_TEMPLATE.to_string(),
        }
    }
}

fn read_template(kind: &str, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        GenError::Config(format!(
            "cannot read {kind} template {}: {e}",
            path.display()
        ))
    })
}

impl TemplateSet {
    /// Built-in templates, with any of them replaced by the file given.
    pub fn with_overrides(
        model: Option<&Path>,
        controller: Option<&Path>,
        router: Option<&Path>,
    ) -> Result<Self> {
        let mut set = Self::default();
        if let Some(path) = model {
            set.model = read_template("model", path)?;
        }
        if let Some(path) = controller {
            set.controller = read_template("controller", path)?;
        }
        if let Some(path) = router {
            set.router = read_template("router", path)?;
        }
        Ok(set)
    }
}

/// Render a `mod.rs` declaring `modules`.
pub fn render_mod_rs(label: &str, modules: &[String]) -> Result<String> {
    ModRsTemplateData {
        label: label.to_string(),
        modules: modules.to_vec(),
    }
    .render()
    .map_err(|e| GenError::Template {
        template: "mod.rs".to_string(),
        message: e.to_string(),
    })
}
