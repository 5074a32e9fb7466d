//! CLI command implementations
//!
//! Both commands load the config, set the log level, then load the schema.
//! A refused write is an answer, not a failure: `check` reports it as an
//! error response and exits cleanly. Only broken config, schema, or input
//! make the process fail.

use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::SyncHost;
use crate::config::SyncConfig;
use crate::observability::Logger;
use crate::schema::{DocumentSchema, SchemaLoader};
use crate::sync::{SyncError, SyncPipeline};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// One write to decide, as read from stdin
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckRequest {
    pub doc: Value,
    #[serde(default)]
    pub old_doc: Option<Value>,
}

impl CheckRequest {
    pub fn parse(value: Value) -> CliResult<Self> {
        let request: CheckRequest = serde_json::from_value(value)
            .map_err(|e| CliError::invalid_request(format!("Invalid check request: {}", e)))?;

        if !request.doc.is_object() {
            return Err(CliError::invalid_request("\"doc\" must be a JSON object"));
        }
        if let Some(old) = &request.old_doc {
            if !old.is_null() && !old.is_object() {
                return Err(CliError::invalid_request(
                    "\"oldDoc\" must be a JSON object or null",
                ));
            }
        }
        Ok(request)
    }

    fn old_doc(&self) -> Option<&Value> {
        self.old_doc.as_ref().filter(|old| !old.is_null())
    }
}

/// Run a command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { config } => check(&config),
        Command::Lint { config } => lint(&config),
    }
}

fn boot(config_path: &Path) -> CliResult<(SyncConfig, DocumentSchema)> {
    let config = SyncConfig::load(config_path)?;
    Logger::set_min_severity(config.severity());
    let schema = SchemaLoader::load_file(&config.schema_path)?;
    Ok((config, schema))
}

/// Decide the write on stdin and print the outcome
pub fn check(config_path: &Path) -> CliResult<()> {
    let (config, schema) = boot(config_path)?;
    let request = CheckRequest::parse(read_request()?)?;

    let pipeline = SyncPipeline::new(schema);
    let mut host = config.host();
    match decide(&pipeline, &request, &mut host)? {
        Ok(data) => write_response(data),
        Err(refusal) => write_error(refusal.code(), &refusal.to_string()),
    }
}

/// Run one request through the pipeline.
///
/// The outer error is a CLI failure; the inner one is a refused write.
pub fn decide(
    pipeline: &SyncPipeline,
    request: &CheckRequest,
    host: &mut dyn SyncHost,
) -> CliResult<Result<Value, SyncError>> {
    match pipeline.process(&request.doc, request.old_doc(), host) {
        Ok(outcome) => Ok(Ok(serde_json::to_value(&outcome)?)),
        Err(SyncError::Configuration(e)) => Err(CliError::schema_error(e.to_string())),
        Err(refusal) => Ok(Err(refusal)),
    }
}

/// Load the schema and print its document types in declaration order
pub fn lint(config_path: &Path) -> CliResult<()> {
    let (_, schema) = boot(config_path)?;
    write_response(lint_report(&schema))
}

pub fn lint_report(schema: &DocumentSchema) -> Value {
    let types: Vec<&str> = schema.type_ids().collect();
    json!({
        "typeCount": types.len(),
        "types": types,
    })
}
