//! Template rendering.
//!
//! Templates see two things: the data passed to [`render`] and the helpers in
//! a [`HelperRegistry`]. The environment starts empty, so no builtin filter,
//! test or global leaks in, and undefined lookups are errors rather than
//! empty strings.

use super::templates::TemplateSet;
use crate::error::{GenError, Result};
use crate::naming;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;

/// A string transform callable from templates.
pub type Helper = fn(&str) -> String;

/// Explicit name → function mapping exposed to templates.
///
/// Every helper is callable both as a filter (`{{ name | pluralize }}`) and as
/// a function (`{{ pluralize(name) }}`).
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<&'static str, Helper>,
}

impl HelperRegistry {
    /// A registry with no helpers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The naming helpers plus `lower_first`.
    pub fn naming() -> Self {
        let mut registry = Self::new();
        registry
            .insert("pluralize", naming::pluralize)
            .insert("singularize", naming::singularize)
            .insert("to_pascal_case", naming::to_pascal_case)
            .insert("to_camel_case", naming::to_camel_case)
            .insert("to_snake_case", naming::to_snake_case)
            .insert("title", naming::title)
            .insert("lower_first", naming::lower_first);
        registry
    }

    /// Register `helper` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: &'static str, helper: Helper) -> &mut Self {
        self.helpers.insert(name, helper);
        self
    }

    /// Registered helper names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    fn install(&self, env: &mut Environment<'_>) {
        for (&name, &helper) in &self.helpers {
            env.add_filter(name, move |value: String| helper(&value));
            env.add_function(name, move |value: String| helper(&value));
        }
    }
}

/// Render `source` with `data`, exposing only `helpers`.
///
/// `name` identifies the template in error messages.
///
/// # Errors
///
/// [`GenError::Template`] on syntax errors, unknown helpers and references to
/// data that is not present.
pub fn render<S: Serialize>(
    name: &str,
    source: &str,
    data: S,
    helpers: &HelperRegistry,
) -> Result<String> {
    let template_error = |e: minijinja::Error| GenError::Template {
        template: name.to_string(),
        message: describe(&e),
    };
    let mut env = Environment::empty();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    helpers.install(&mut env);
    let template = env
        .template_from_named_str(name, source)
        .map_err(template_error)?;
    template.render(data).map_err(template_error)
}

fn describe(err: &minijinja::Error) -> String {
    let mut message = err.to_string();
    if let Some(line) = err.line() {
        message.push_str(&format!(" (line {line})"));
    }
    message
}

/// The three templates of a run with the standard helper registry.
#[derive(Debug, Clone)]
pub struct Renderer {
    templates: TemplateSet,
    helpers: HelperRegistry,
}

impl Renderer {
    /// Renderer over `templates` with [`HelperRegistry::naming`].
    pub fn new(templates: TemplateSet) -> Self {
        Renderer {
            templates,
            helpers: HelperRegistry::naming(),
        }
    }

    /// The helper registry templates are rendered with.
    pub fn helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    /// Render the model template.
    pub fn model<S: Serialize>(&self, data: S) -> Result<String> {
        render("model", &self.templates.model, data, &self.helpers)
    }

    /// Render the controller template.
    pub fn controller<S: Serialize>(&self, data: S) -> Result<String> {
        render("controller", &self.templates.controller, data, &self.helpers)
    }

    /// Render the router template.
    pub fn router<S: Serialize>(&self, data: S) -> Result<String> {
        render("router", &self.templates.router, data, &self.helpers)
    }
}
