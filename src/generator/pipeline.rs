//! Run orchestration.
//!
//! ```text
//! Idle → Connecting → Introspecting → Generating(table)* → IndexingModules
//!      → [RenderingRouter] → Done
//!                                  any error ↘ Failed
//! ```
//!
//! The first error from any stage aborts the run. Every struct is built and
//! checked for name collisions before the first file is written; after that,
//! artifacts are written table by table, so a later failure leaves earlier
//! files on disk.

use super::format::format_source;
use super::model::{build_struct, check_collisions, StructSpec};
use super::render::Renderer;
use super::sink::Sink;
use super::templates::{render_mod_rs, ControllerData, RouterData, RouterEntry, TemplateSet};
use super::GenerationRequest;
use crate::error::GenError;
use crate::schema::{self, ConnectionConfig, SchemaSource, TableDescriptor};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Where a run is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Nothing started
    Idle,
    /// Opening the database connection
    Connecting,
    /// Reading table metadata
    Introspecting,
    /// Building, rendering or writing one table's artifacts
    Generating(String),
    /// Rendering and writing `model/mod.rs`
    IndexingModules,
    /// Rendering and writing the router and `api/mod.rs`
    RenderingRouter,
    /// Every artifact written
    Done,
    /// Aborted; see the accompanying [`Failure`]
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => f.write_str("idle"),
            Stage::Connecting => f.write_str("connecting"),
            Stage::Introspecting => f.write_str("introspecting"),
            Stage::Generating(table) => write!(f, "generating `{table}`"),
            Stage::IndexingModules => f.write_str("writing module index"),
            Stage::RenderingRouter => f.write_str("rendering router"),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// A failed run: the stage that was active and what went wrong.
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct Failure {
    /// Stage active when the error occurred
    pub stage: Stage,
    /// Underlying error
    pub source: GenError,
}

/// What a successful run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Artifact paths relative to the sink root, in write order
    pub written: Vec<PathBuf>,
    /// Generated struct names, in introspection order
    pub structs: Vec<String>,
}

/// Drives one generation run.
#[derive(Debug)]
pub struct Generator {
    request: GenerationRequest,
    renderer: Renderer,
    stage: Stage,
}

impl Generator {
    /// A generator for `request` rendering with `templates`.
    pub fn new(request: GenerationRequest, templates: TemplateSet) -> Self {
        Generator {
            request,
            renderer: Renderer::new(templates),
            stage: Stage::Idle,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The request this generator runs.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    fn fail(&mut self, source: GenError) -> Failure {
        let stage = std::mem::replace(&mut self.stage, Stage::Failed);
        error!(stage = %stage, error = %source, "generation failed");
        Failure { stage, source }
    }

    /// Connect, introspect and generate.
    pub fn run(
        &mut self,
        config: &ConnectionConfig,
        sink: &mut dyn Sink,
    ) -> Result<RunReport, Failure> {
        self.enter(Stage::Connecting);
        let source = schema::connect(config).map_err(|e| self.fail(e))?;
        self.run_with_source(source, sink)
    }

    /// Introspect an already connected source and generate.
    ///
    /// The source is dropped, releasing its connection, once introspection ends.
    pub fn run_with_source(
        &mut self,
        source: Box<dyn SchemaSource>,
        sink: &mut dyn Sink,
    ) -> Result<RunReport, Failure> {
        self.enter(Stage::Introspecting);
        let tables = schema::introspect(source, &self.request.tables).map_err(|e| self.fail(e))?;
        self.generate(&tables, sink)
    }

    /// Generate artifacts for already introspected tables.
    pub fn generate(
        &mut self,
        tables: &[TableDescriptor],
        sink: &mut dyn Sink,
    ) -> Result<RunReport, Failure> {
        let mut specs = Vec::with_capacity(tables.len());
        for table in tables {
            self.enter(Stage::Generating(table.name.clone()));
            let spec = build_struct(table, &self.request).map_err(|e| self.fail(e))?;
            debug!(table = %table.name, spec = ?spec, "built struct");
            specs.push(spec);
        }
        check_collisions(&specs, self.request.generate_rest_artifacts)
            .map_err(|e| self.fail(e))?;

        let mut report = RunReport {
            written: Vec::new(),
            structs: specs.iter().map(|s| s.struct_name.clone()).collect(),
        };
        for spec in &specs {
            self.enter(Stage::Generating(spec.table_name.clone()));
            self.emit_table(spec, sink, &mut report)
                .map_err(|e| self.fail(e))?;
        }
        self.enter(Stage::IndexingModules);
        let models: Vec<String> = specs.iter().map(|s| s.module.clone()).collect();
        self.emit_mod_rs("model", "models", &models, sink, &mut report)
            .map_err(|e| self.fail(e))?;

        if self.request.generate_rest_artifacts {
            self.enter(Stage::RenderingRouter);
            self.emit_router(&specs, sink, &mut report)
                .map_err(|e| self.fail(e))?;
            let mut controllers = vec!["router".to_string()];
            controllers.extend(models);
            self.emit_mod_rs("api", "controllers", &controllers, sink, &mut report)
                .map_err(|e| self.fail(e))?;
        }

        self.enter(Stage::Done);
        info!(
            tables = specs.len(),
            files = report.written.len(),
            "generation complete"
        );
        Ok(report)
    }

    fn emit_table(
        &self,
        spec: &StructSpec,
        sink: &mut dyn Sink,
        report: &mut RunReport,
    ) -> Result<(), GenError> {
        let model = self.renderer.model(spec)?;
        write(sink, report, &artifact_path("model", &spec.file_stem), &model)?;

        if self.request.generate_rest_artifacts {
            let controller = self.renderer.controller(ControllerData {
                package_name: self.request.package_name.clone(),
                struct_name: spec.struct_name.clone(),
                table_name: spec.table_name.clone(),
                module: spec.module.clone(),
            })?;
            write(sink, report, &artifact_path("api", &spec.file_stem), &controller)?;
        }
        Ok(())
    }

    fn emit_router(
        &self,
        specs: &[StructSpec],
        sink: &mut dyn Sink,
        report: &mut RunReport,
    ) -> Result<(), GenError> {
        let router = self.renderer.router(RouterData {
            package_name: self.request.package_name.clone(),
            entries: specs
                .iter()
                .map(|s| RouterEntry {
                    struct_name: s.struct_name.clone(),
                    module: s.module.clone(),
                    table_name: s.table_name.clone(),
                })
                .collect(),
        })?;
        write(sink, report, &artifact_path("api", "router"), &router)
    }

    fn emit_mod_rs(
        &self,
        dir: &str,
        label: &str,
        modules: &[String],
        sink: &mut dyn Sink,
        report: &mut RunReport,
    ) -> Result<(), GenError> {
        let rendered = render_mod_rs(label, modules)?;
        write(sink, report, &artifact_path(dir, "mod"), &rendered)
    }
}

fn artifact_path(dir: &str, stem: &str) -> PathBuf {
    Path::new(dir).join(format!("{stem}.rs"))
}

/// Format `raw` and hand it to the sink; nothing is written if formatting fails.
fn write(
    sink: &mut dyn Sink,
    report: &mut RunReport,
    path: &Path,
    raw: &str,
) -> Result<(), GenError> {
    let artifact = path.to_string_lossy();
    let formatted = format_source(&artifact, raw)?;
    sink.write(path, &formatted)?;
    info!(path = %artifact, "generated");
    report.written.push(path.to_path_buf());
    Ok(())
}
