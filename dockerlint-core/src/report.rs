//! The structured result written to stdout.

use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::error::{DockerLintError, Result};
use crate::options::Threshold;
use crate::select::RunnerId;

/// Final, self-describing outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// `0` on success (including help), `1` otherwise.
    pub exit_code: i32,
    /// Failure threshold the targets were linted at.
    pub threshold: Threshold,
    /// Whether strict missing-file handling was enabled.
    pub strict: bool,
    /// Existing targets as absolute paths.
    pub targets: Vec<String>,
    /// Missing targets as absolute paths.
    pub missing: Vec<String>,
    /// Targets hadolint rejected; always a subset of `targets`.
    pub failed: Vec<String>,
    /// Runner that executed the targets.
    pub runner: RunnerId,
    /// Milliseconds since the Unix epoch when the run started.
    pub started_at_epoch_ms: i64,
    /// Milliseconds since the Unix epoch when the report was built.
    pub finished_at_epoch_ms: i64,
}

/// Schema document describing [`LintReport`].
///
/// Library API for tools that consume the report; the binary's stdout only
/// ever carries the report itself.
#[derive(OpenApi)]
#[openapi(components(schemas(LintReport, Threshold, RunnerId)))]
pub struct ReportSchema;

/// Render the report schema as pretty JSON.
pub fn report_schema_json() -> std::result::Result<String, serde_json::Error> {
    ReportSchema::openapi().to_pretty_json()
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(
    payload: &T,
) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Write the report as one JSON document followed by a newline.
pub fn write_report(out: &mut dyn Write, report: &LintReport) -> Result<()> {
    let json = render_json(report).map_err(|err| DockerLintError::Other(err.to_string()))?;
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}

pub(crate) fn path_strings(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|path| path.display().to_string()).collect()
}
