use crate::config::{resolve_config, validate_package_path, FileConfig};
use crate::error::GenError;
use crate::generator::{
    DryRunSink, FsSink, GenerationRequest, Generator, RunReport, Sink, TemplateSet,
    DEFAULT_PACKAGE,
};
use crate::schema::{ConnectionConfig, Engine};
use crate::types::{NullableTypeFamily, TypeMapper, TYPE_RULES};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for schemagen
///
/// Reads a live database schema and writes Rust models, and optionally REST
/// controllers and a router, for its tables.
#[derive(Debug, Parser)]
#[command(name = "schemagen", version)]
#[command(about = "Generate Rust models and REST handlers from a database schema", long_about = None)]
pub struct Cli {
    /// Log at debug level, even when RUST_LOG is set, including every struct description
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Introspect a database and generate code for its tables
    Generate(GenerateArgs),
    /// Print the native type → Rust type mapping table
    Types {
        /// Nullable representation to show in the last column
        #[arg(long, value_enum, default_value_t = NullableTypeFamily::BasicWrapper)]
        nullable: NullableTypeFamily,
    },
}

/// Flags of `schemagen generate`
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Database engine family
    #[arg(short, long, value_enum)]
    pub engine: Engine,

    /// Full connection URL; for SQLite, the database file
    #[arg(long, env = "SCHEMAGEN_DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user
    #[arg(short, long)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "SCHEMAGEN_DATABASE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name; for SQLite, the database file
    #[arg(short, long)]
    pub dbname: Option<String>,

    /// PostgreSQL schema to read (default: public)
    #[arg(long)]
    pub schema: Option<String>,

    /// Path prefix of the crate the code is generated into (default: crate)
    #[arg(short, long)]
    pub package: Option<String>,

    /// Add serde derives and column renames
    #[arg(long, default_value_t = false)]
    pub serde: bool,

    /// Add sea_orm attributes (the default)
    #[arg(long, default_value_t = false, overrides_with = "no_orm")]
    pub orm: bool,

    /// Leave out sea_orm attributes
    #[arg(long, default_value_t = false, overrides_with = "orm")]
    pub no_orm: bool,

    /// How nullable columns are represented
    #[arg(long, value_enum)]
    pub nullable: Option<NullableTypeFamily>,

    /// Also generate REST controllers and a router
    #[arg(long, default_value_t = false)]
    pub rest: bool,

    /// Only generate these tables (comma-separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Config file (default: schemagen.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model template file
    #[arg(long)]
    pub model_template: Option<PathBuf>,

    /// Controller template file
    #[arg(long)]
    pub controller_template: Option<PathBuf>,

    /// Router template file
    #[arg(long)]
    pub router_template: Option<PathBuf>,

    /// Map decimals wider than 28 digits, or without a precision, to f64 instead of failing
    #[arg(long, default_value_t = false)]
    pub approximate_decimals: bool,

    /// Render and validate everything but write nothing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Everything a `generate` invocation resolved to.
#[derive(Debug, Clone)]
pub struct GeneratePlan {
    /// Database to introspect
    pub connection: ConnectionConfig,
    /// What to generate
    pub request: GenerationRequest,
    /// Templates to render with
    pub templates: TemplateSet,
    /// Output root
    pub out: PathBuf,
    /// Skip writing
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Connection settings from the flags.
    pub fn connection(&self) -> Result<ConnectionConfig, GenError> {
        if self.engine == Engine::Sqlite && self.url.is_none() && self.dbname.is_none() {
            return Err(GenError::Config(
                "sqlite needs the database file as --dbname or --url".to_string(),
            ));
        }
        Ok(ConnectionConfig {
            engine: self.engine,
            url: self.url.clone(),
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            dbname: self.dbname.clone(),
            schema: self.schema.clone(),
        })
    }

    /// Merge the flags over `file`; flags win.
    pub fn plan(&self, file: Option<FileConfig>) -> Result<GeneratePlan, GenError> {
        let file = file.unwrap_or_default();
        let package_name = self
            .package
            .clone()
            .or(file.package)
            .unwrap_or_else(|| DEFAULT_PACKAGE.to_string());
        validate_package_path(&package_name)?;

        let orm_annotation = if self.no_orm {
            false
        } else if self.orm {
            true
        } else {
            file.orm.unwrap_or(true)
        };
        let tables = if self.tables.is_empty() {
            file.tables
        } else {
            self.tables.clone()
        };

        let request = GenerationRequest {
            package_name,
            serialization_annotation: self.serde || file.serde.unwrap_or(false),
            orm_annotation,
            nullable_type_family: self.nullable.or(file.nullable).unwrap_or_default(),
            generate_rest_artifacts: self.rest || file.rest.unwrap_or(false),
            approximate_decimals: self.approximate_decimals
                || file.approximate_decimals.unwrap_or(false),
            name_overrides: file.names,
            tables,
        };

        let templates = TemplateSet::with_overrides(
            self.model_template.as_deref().or(file.templates.model.as_deref()),
            self.controller_template
                .as_deref()
                .or(file.templates.controller.as_deref()),
            self.router_template.as_deref().or(file.templates.router.as_deref()),
        )?;

        Ok(GeneratePlan {
            connection: self.connection()?,
            request,
            templates,
            out: self
                .out
                .clone()
                .or(file.out)
                .unwrap_or_else(|| PathBuf::from(".")),
            dry_run: self.dry_run,
        })
    }
}

/// Execute a resolved plan against the database.
pub fn run_generate(plan: GeneratePlan) -> anyhow::Result<RunReport> {
    info!(
        engine = %plan.connection.engine,
        package = %plan.request.package_name,
        out = %plan.out.display(),
        rest = plan.request.generate_rest_artifacts,
        dry_run = plan.dry_run,
        "starting generation"
    );
    let mut generator = Generator::new(plan.request, plan.templates);
    let mut dry = DryRunSink::default();
    let mut fs = FsSink::new(&plan.out);
    let sink: &mut dyn Sink = if plan.dry_run { &mut dry } else { &mut fs };
    let report = generator.run(&plan.connection, sink)?;
    Ok(report)
}

/// Rows of the type table: native tokens, Rust type, nullable Rust type.
pub fn type_table(family: NullableTypeFamily) -> Vec<(String, String, String)> {
    let mapper = TypeMapper::new(family);
    TYPE_RULES
        .iter()
        .map(|rule| {
            let (plain, nullable) = mapper.describe(rule);
            (rule.tokens.join(", "), plain.rust_type, nullable.rust_type)
        })
        .collect()
}

/// The type table as aligned text.
pub fn format_type_table(family: NullableTypeFamily) -> String {
    let rows = type_table(family);
    let width = rows.iter().map(|(n, _, _)| n.len()).max().unwrap_or(0);
    let rust_width = rows.iter().map(|(_, r, _)| r.len()).max().unwrap_or(0);
    let mut out = format!("{:width$}  {:rust_width$}  nullable\n", "native", "rust");
    for (native, rust, nullable) in rows {
        out.push_str(&format!("{native:width$}  {rust:rust_width$}  {nullable}\n"));
    }
    out
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The config file or a template file cannot be read or is invalid
/// - The database cannot be reached or its schema read
/// - Any stage of generation fails; the error names the stage
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let file = resolve_config(args.config.as_deref())?;
            let plan = args.plan(file)?;
            let out = plan.out.clone();
            let dry_run = plan.dry_run;
            let report = run_generate(plan)?;
            if dry_run {
                println!(
                    "Dry run: {} files for {} tables would be written to {}",
                    report.written.len(),
                    report.structs.len(),
                    out.display()
                );
            } else {
                println!(
                    "✅ Generated {} files for {} tables in {}",
                    report.written.len(),
                    report.structs.len(),
                    out.display()
                );
            }
            for path in &report.written {
                println!("   {}", out.join(path).display());
            }
            Ok(())
        }
        Commands::Types { nullable } => {
            print!("{}", format_type_table(nullable));
            Ok(())
        }
    }
}
