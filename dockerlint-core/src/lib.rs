#![deny(missing_docs)]
//! dockerlint core library.
//!
//! Resolves Dockerfile targets, picks between a local hadolint binary and a
//! containerized one, lints each target, and assembles the JSON report the
//! `dockerlint` binary prints. Every host interaction goes through a trait
//! so the whole pipeline runs in tests without hadolint, docker, or a clock.

pub mod clock;
pub mod config;
pub mod error;
pub mod executor;
pub mod fs;
pub mod options;
pub mod process;
pub mod report;
pub mod resolve;
pub mod runner;
pub mod select;

pub use clock::{Clock, SystemClock};
pub use config::RunnerConfig;
pub use error::{DockerLintError, Result};
pub use executor::{LintEnvironment, LintExecution, LintExecutor, Termination, ValidationError};
pub use fs::{FileSystem, StdFileSystem};
pub use options::{DEFAULT_TARGET, Options, ParseOutcome, Threshold};
pub use process::{CommandProbe, CommandSpec, ProcessLauncher, StdProcessLauncher, ToolProbe};
pub use report::{LintReport, ReportSchema, render_json, report_schema_json, write_report};
pub use resolve::{PathResolver, ResolveResult};
pub use runner::{BinaryRunner, ContainerRunner, LintRunner, Runner};
pub use select::{RunnerChoice, RunnerId, select};
