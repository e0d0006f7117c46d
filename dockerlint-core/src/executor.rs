//! Orchestration of one lint invocation.
//!
//! The executor walks a fixed sequence of stages: parse, resolve, select a
//! runner, validate, lint every existing target, aggregate, and emit. Any
//! stage may end the run early, but every path produces a complete
//! [`LintReport`]. Expected endings travel as [`Termination`] values; host
//! faults come back as `Err` and are absorbed in [`LintExecutor::run`].

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::clock::Clock;
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::options::{Options, ParseOutcome, Threshold};
use crate::process::{ProcessLauncher, ToolProbe};
use crate::report::{LintReport, path_strings};
use crate::resolve::{PathResolver, ResolveResult};
use crate::runner::{LintRunner, Runner};
use crate::select::{RunnerChoice, RunnerId, select};

/// Host collaborators injected into the executor.
#[derive(Clone, Copy)]
pub struct LintEnvironment<'a> {
    /// Existence checks and working directory.
    pub fs: &'a dyn FileSystem,
    /// Availability of the binary and the container runtime.
    pub probe: &'a dyn ToolProbe,
    /// Launches hadolint.
    pub launcher: &'a dyn ProcessLauncher,
    /// Timestamps for the report.
    pub clock: &'a dyn Clock,
    /// Program names and container image.
    pub config: &'a RunnerConfig,
}

/// Reasons resolved targets cannot be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Strict mode is on and some targets do not exist.
    StrictMissing {
        /// Number of missing targets.
        count: usize,
    },
    /// No target exists.
    NoTargets,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrictMissing { count } => write!(
                f,
                "strict mode: {count} target(s) missing, refusing to lint a partial set"
            ),
            Self::NoTargets => write!(f, "no Dockerfile targets exist, nothing to lint"),
        }
    }
}

/// Aggregate of the execute loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintExecution {
    /// `0` when every target passed, `1` otherwise.
    pub exit_code: i32,
    /// Targets that returned a non-zero status, in lint order.
    pub failed: Vec<PathBuf>,
    /// Runner that executed the targets.
    pub runner: RunnerId,
}

impl LintExecution {
    fn aggregate(failed: Vec<PathBuf>, runner: RunnerId) -> Self {
        Self {
            exit_code: if failed.is_empty() { 0 } else { 1 },
            failed,
            runner,
        }
    }
}

/// How a run ended, short of a host fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Usage was requested.
    Help,
    /// Arguments were invalid.
    ParseError(String),
    /// No runner could be used.
    EnvironmentUnavailable(String),
    /// Resolved targets failed validation.
    Validation(ValidationError),
    /// Every existing target was linted.
    Completed(LintExecution),
}

impl Termination {
    /// Process exit status for this ending.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Help => 0,
            Self::Completed(execution) => execution.exit_code,
            Self::ParseError(_) | Self::EnvironmentUnavailable(_) | Self::Validation(_) => 1,
        }
    }

    /// Diagnostic text for endings that stop before linting, if any.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::ParseError(message) => {
                Some(format!("error: {message}\nRun with --help for usage."))
            }
            Self::EnvironmentUnavailable(reason) => Some(format!("error: {reason}")),
            Self::Validation(invalid) => Some(format!("error: {invalid}")),
            Self::Help | Self::Completed(_) => None,
        }
    }
}

/// Fields known so far; what survives into the report if a stage fails.
#[derive(Debug, Default)]
struct Progress {
    threshold: Threshold,
    strict: bool,
    resolved: ResolveResult,
    failed: Vec<PathBuf>,
    runner: RunnerId,
}

/// Drives one invocation from parsed arguments to a report.
pub struct LintExecutor<'a> {
    env: LintEnvironment<'a>,
}

impl<'a> LintExecutor<'a> {
    /// Create an executor over the given collaborators.
    pub fn new(env: LintEnvironment<'a>) -> Self {
        Self { env }
    }

    /// Run to completion, narrating to `diag`.
    ///
    /// Never fails: host faults are logged and reported with exit code `1`.
    pub fn run(&self, outcome: ParseOutcome, diag: &mut dyn Write) -> LintReport {
        let started = self.env.clock.now_epoch_ms();
        let mut progress = Progress::default();

        let ending = match self.drive(outcome, &mut progress, diag) {
            Ok(termination) => termination,
            Err(err) => {
                error!("unexpected host failure: {err}");
                say(diag, format!("error: unexpected failure: {err}"));
                let failed = progress.failed.clone();
                return self.report(1, failed, progress.runner, &progress, started);
            }
        };
        if let Some(text) = ending.diagnostic() {
            say(diag, text);
        }

        match ending {
            Termination::Completed(execution) => self.report(
                execution.exit_code,
                execution.failed,
                execution.runner,
                &progress,
                started,
            ),
            other => {
                let exit_code = other.exit_code();
                self.report(exit_code, Vec::new(), RunnerId::Unknown, &progress, started)
            }
        }
    }

    fn drive(
        &self,
        outcome: ParseOutcome,
        progress: &mut Progress,
        diag: &mut dyn Write,
    ) -> Result<Termination> {
        let options = match outcome {
            ParseOutcome::Parsed(options) => options,
            ParseOutcome::HelpRequested { usage } => {
                say(diag, usage.trim_end());
                return Ok(Termination::Help);
            }
            ParseOutcome::ParseError { message } => {
                return Ok(Termination::ParseError(message));
            }
        };
        progress.threshold = options.threshold();
        progress.strict = options.strict();

        progress.resolved = self.resolve(&options, diag)?;

        let choice = self.select_runner();
        let runner = match LintRunner::from_choice(&choice, self.env.config, self.env.launcher) {
            Some(runner) => runner,
            None => {
                let reason = match choice {
                    RunnerChoice::Unavailable { reason } => reason,
                    _ => "no runner available".to_string(),
                };
                return Ok(Termination::EnvironmentUnavailable(format!(
                    "{reason} (looked for `{}` and `{}`)",
                    self.env.config.binary, self.env.config.container_runtime
                )));
            }
        };
        progress.runner = runner.id();
        info!("selected {} runner", runner.id());

        if let Err(invalid) = validate(&options, &progress.resolved) {
            return Ok(Termination::Validation(invalid));
        }

        self.lint_all(&runner, options.threshold(), progress, diag)?;

        let execution = LintExecution::aggregate(progress.failed.clone(), runner.id());
        let total = progress.resolved.existing.len();
        say(
            diag,
            format!(
                "{}/{total} target(s) passed with the {} runner",
                total - execution.failed.len(),
                execution.runner
            ),
        );
        Ok(Termination::Completed(execution))
    }

    fn resolve(&self, options: &Options, diag: &mut dyn Write) -> Result<ResolveResult> {
        let base_dir = self.env.fs.current_dir()?;
        let resolved =
            PathResolver::new(base_dir).resolve(options, |path| self.env.fs.is_file(path));
        for path in &resolved.missing {
            say(diag, format!("warning: target not found: {}", path.display()));
        }
        say(
            diag,
            format!(
                "resolved {} target(s), {} missing",
                resolved.existing.len(),
                resolved.missing.len()
            ),
        );
        Ok(resolved)
    }

    fn select_runner(&self) -> RunnerChoice {
        let config = self.env.config;
        let binary = self.env.probe.is_available(&config.binary);
        // The container answer only matters when the binary is absent.
        let container = !binary && self.env.probe.is_available(&config.container_runtime);
        debug!("availability: binary={binary} container={container}");
        select(binary, container)
    }

    fn lint_all(
        &self,
        runner: &LintRunner<'_>,
        threshold: Threshold,
        progress: &mut Progress,
        diag: &mut dyn Write,
    ) -> Result<()> {
        let targets = progress.resolved.existing.clone();
        for target in &targets {
            say(diag, format!("running hadolint on {}", target.display()));
            let status = runner.execute(target, threshold)?;
            debug!("{} -> status {status}", target.display());
            if status != 0 {
                say(
                    diag,
                    format!(
                        "error: {} failed at threshold {threshold} (status {status}): {}",
                        target.display(),
                        runner.command_description(target, threshold)
                    ),
                );
                progress.failed.push(target.clone());
            }
        }
        Ok(())
    }

    fn report(
        &self,
        exit_code: i32,
        failed: Vec<PathBuf>,
        runner: RunnerId,
        progress: &Progress,
        started: i64,
    ) -> LintReport {
        let finished = self.env.clock.now_epoch_ms().max(started);
        LintReport {
            exit_code,
            threshold: progress.threshold,
            strict: progress.strict,
            targets: path_strings(&progress.resolved.existing),
            missing: path_strings(&progress.resolved.missing),
            failed: path_strings(&failed),
            runner,
            started_at_epoch_ms: started,
            finished_at_epoch_ms: finished,
        }
    }
}

fn validate(
    options: &Options,
    resolved: &ResolveResult,
) -> std::result::Result<(), ValidationError> {
    if options.strict() && !resolved.missing.is_empty() {
        return Err(ValidationError::StrictMissing {
            count: resolved.missing.len(),
        });
    }
    if resolved.existing.is_empty() {
        return Err(ValidationError::NoTargets);
    }
    Ok(())
}

fn say(diag: &mut dyn Write, line: impl AsRef<str>) {
    let _ = writeln!(diag, "{}", line.as_ref());
}
