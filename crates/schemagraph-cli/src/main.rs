mod output;
mod registry;
mod settings;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use schemagraph_core::render::{DEFAULT_BASE_IRI, FactDocument, Vocabulary};
use schemagraph_core::{Error as CoreError, FactBuffer};
use schemagraph_introspect::{
    ConnectionConfig, ENV_PREFIX, PostgresGateway, StatisticsGateway, infer,
};
use thiserror::Error;
use uuid::Uuid;

use output::{OutputFormat, render_facts};
use registry::{RunContext, RunOptions, init_run_logging, start_run, write_facts, write_report};
use settings::{FileSettings, InferenceSettings, SettingsError, load_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("config file error: {0}")]
    Settings(#[from] SettingsError),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "schemagraph",
    version,
    about = "Infer dimensions, keys and relationships from a relational schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one inference pass and write the facts.
    Extract(ExtractArgs),
    /// Print the JSON Schema of the facts document.
    Schema,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Database connection URL. Overrides the config file and VIS_MONDIAL_* variables.
    #[arg(long, value_name = "CONNECTION_STRING")]
    conn: Option<String>,
    /// TOML file with [connection] and [inference] tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Database schema to analyse (default: public).
    #[arg(long)]
    schema: Option<String>,
    /// Output format for the facts.
    #[arg(long, value_enum, default_value_t = OutputFormat::Ntriples)]
    format: OutputFormat,
    /// Also write the facts to this path.
    #[arg(short = 'f', long)]
    out: Option<PathBuf>,
    /// Do not print the facts on stdout.
    #[arg(long, default_value_t = false)]
    no_stdout: bool,
    /// Log progress to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Base IRI for N-Triples output.
    #[arg(long, value_name = "IRI")]
    base_iri: Option<String>,
    /// Distinct count at or below which a column is discrete.
    #[arg(long)]
    discrete_threshold: Option<u64>,
    /// Minimum grouped maximum for deciding compound key strength.
    #[arg(long)]
    strength_threshold: Option<u64>,
    /// Emit only dimension, key and relationship facts.
    #[arg(long, default_value_t = false)]
    no_catalog_facts: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => run_extract(args).await,
        Command::Schema => print_schema(),
    }
}

fn print_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(FactDocument);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}

async fn run_extract(args: ExtractArgs) -> Result<(), CliError> {
    let file = match &args.config {
        Some(path) => load_settings(path)?,
        None => FileSettings::default(),
    };

    let connection = resolve_connection(args.conn.clone(), file.connection)?;

    let cli_inference = InferenceSettings {
        schema: args.schema.clone(),
        discrete_threshold: args.discrete_threshold,
        strength_threshold: args.strength_threshold,
        include_catalog_facts: args.no_catalog_facts.then_some(false),
        base_iri: args.base_iri.clone(),
    };
    let inference = cli_inference.or(file.inference);
    let options = inference.to_options();
    let vocabulary = Vocabulary::new(inference.base_iri.as_deref().unwrap_or(DEFAULT_BASE_IRI));

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        engine: "postgres".to_string(),
        run_dir: args.run_dir,
        options: RunOptions {
            inference: options.clone(),
            format: args.format,
            base_iri: vocabulary.base().to_string(),
        },
        connection: connection.redacted()?,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path, args.verbose)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        run_dir = %run_paths.root.display(),
        connection = %run_ctx.connection.redacted,
        schema = %options.schema
    );

    let timer = Instant::now();

    let gateway = PostgresGateway::connect(&connection).await.inspect_err(|err| {
        tracing::error!(event = "run_failed", stage = "connect", error = %err);
    })?;
    tracing::info!(event = "engine_detected", engine = gateway.engine());

    let mut facts = FactBuffer::new();
    let report = infer(&gateway, &options, &mut facts)
        .await
        .inspect_err(|err| {
            tracing::error!(event = "run_failed", stage = "inference", error = %err);
        })?;

    let rendered = render_facts(args.format, &options.schema, vocabulary.base(), facts.facts())?;

    write_facts(&run_paths, &rendered, args.out.as_deref())?;
    tracing::info!(
        event = "facts_written",
        path = %run_paths.facts_path.display(),
        facts = facts.len()
    );

    write_report(&run_paths, &report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    if args.out.is_none() && !args.no_stdout {
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

/// First configured source wins: `--conn`, then the config file, then the environment.
fn resolve_connection(
    conn: Option<String>,
    file: ConnectionConfig,
) -> Result<ConnectionConfig, CliError> {
    if let Some(url) = conn {
        return Ok(ConnectionConfig::from_url(url));
    }
    if !file.is_empty() {
        return Ok(file);
    }

    let env = ConnectionConfig::from_env()?;
    if env.is_empty() {
        return Err(CliError::InvalidConfig(format!(
            "no connection configured: pass --conn, add a [connection] table to --config, \
             or set {ENV_PREFIX}* variables"
        )));
    }
    Ok(env)
}
