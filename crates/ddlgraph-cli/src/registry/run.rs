use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ddlgraph_core::{GraphReport, MetadataSnapshot, RedactedConnection, StatementSet};

use super::{RegistryError, RegistryResult};

/// Options recorded with each run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    pub schema: Option<String>,
    pub include_views: bool,
    pub include_key_column_usage: bool,
    pub qualify_names: bool,
    pub drop_if_exists: bool,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: &'static str,
    pub dialect: &'static str,
    pub run_dir: PathBuf,
    pub options: RunOptions,
    pub connection: RedactedConnection,
}

/// `config.json` written to each run directory.
#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    run_id: &'a str,
    started_at: String,
    command: &'a str,
    dialect: &'a str,
    options: &'a RunOptions,
    connection: &'a RedactedConnection,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub statements_path: PathBuf,
    pub graph_path: PathBuf,
    pub script_path: PathBuf,
}

/// Create `<run_dir>/<timestamp>__run_<id>/`, write `config.json` and an
/// empty `logs.ndjson`.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));
    create_dir_all(&root)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        command: ctx.command,
        dialect: ctx.dialect,
        options: &ctx.options,
        connection: &ctx.connection,
    };
    write_json(&root.join("config.json"), &config)?;

    let logs_path = root.join("logs.ndjson");
    OpenOptions::new().create(true).append(true).open(&logs_path)?;

    Ok(RunPaths {
        logs_path,
        snapshot_path: root.join("snapshot.json"),
        statements_path: root.join("statements.json"),
        graph_path: root.join("graph.json"),
        script_path: root.join("schema.sql"),
        root,
    })
}

/// Write the statement lists, graph report and SQL script of one pass.
pub fn write_artifacts(
    paths: &RunPaths,
    statements: &StatementSet,
    report: &GraphReport,
) -> RegistryResult<()> {
    write_json(&paths.statements_path, statements)?;
    write_graph(paths, report)?;
    write_script(&paths.script_path, &statements.to_script())
}

/// Write the fetched catalog metadata so a pass can be inspected offline.
pub fn write_snapshot(paths: &RunPaths, snapshot: &MetadataSnapshot) -> RegistryResult<()> {
    write_json(&paths.snapshot_path, snapshot)
}

pub fn write_graph(paths: &RunPaths, report: &GraphReport) -> RegistryResult<()> {
    write_json(&paths.graph_path, report)
}

/// Write a SQL script, creating missing parent directories.
pub fn write_script(path: &Path, script: &str) -> RegistryResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(script.as_bytes())?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
