use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use schemagraph_core::FACTS_FORMAT_VERSION;
use schemagraph_introspect::{InferOptions, InferenceReport, RedactedConnection};

use super::RegistryResult;
use super::atomic::{write_bytes_atomic, write_json_atomic};
use crate::output::OutputFormat;

/// Serializable options for runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    #[serde(flatten)]
    pub inference: InferOptions,
    pub format: OutputFormat,
    pub base_iri: String,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub engine: String,
    pub run_dir: PathBuf,
    pub options: RunOptions,
    pub connection: RedactedConnection,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub engine: String,
    pub format_version: String,
    pub options: RunOptions,
    pub connection: RedactedConnection,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub facts_path: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
}

fn run_root(ctx: &RunContext) -> PathBuf {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id))
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let root = run_root(ctx);
    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        engine: ctx.engine.clone(),
        format_version: FACTS_FORMAT_VERSION.to_string(),
        options: ctx.options.clone(),
        connection: ctx.connection.clone(),
        git: collect_git_info(),
    };

    write_json_atomic(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        facts_path: root.join(ctx.options.format.file_name()),
        report_path: root.join("report.json"),
        logs_path,
        root,
    })
}

/// Store rendered facts in the run directory and, when given, at `out_path`.
pub fn write_facts(
    paths: &RunPaths,
    rendered: &str,
    out_path: Option<&Path>,
) -> RegistryResult<()> {
    write_bytes_atomic(&paths.facts_path, rendered.as_bytes())?;

    if let Some(out_path) = out_path {
        write_bytes_atomic(out_path, rendered.as_bytes())?;
    }

    Ok(())
}

pub fn write_report(paths: &RunPaths, report: &InferenceReport) -> RegistryResult<()> {
    write_json_atomic(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}
