//! External process seams: launching the linter and probing for programs.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{DockerLintError, Result};

/// Status reported for a child that exited without a code (killed by a signal).
pub const SIGNALED_STATUS: i32 = 1;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// File whose bytes are streamed to the child's stdin.
    pub stdin: Option<PathBuf>,
}

impl CommandSpec {
    /// Command with no stdin redirection.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
        }
    }

    /// Stream `path` into the child's stdin.
    pub fn with_stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(path) = &self.stdin {
            write!(f, " < {}", path.display())?;
        }
        Ok(())
    }
}

/// Launches a command and waits for it to finish.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessLauncher {
    /// Run to completion and return the exit status.
    ///
    /// A non-zero status is a normal return; `Err` is reserved for failures
    /// to start the process or open its input.
    fn run(&self, spec: &CommandSpec) -> Result<i32>;
}

/// Launcher backed by `std::process`.
///
/// The child's stdout is attached to this process's stderr so the tool's
/// findings show up live without touching the report stream.
#[derive(Debug, Default, Clone)]
pub struct StdProcessLauncher;

impl ProcessLauncher for StdProcessLauncher {
    fn run(&self, spec: &CommandSpec) -> Result<i32> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit());
        match &spec.stdin {
            Some(path) => {
                command.stdin(Stdio::from(File::open(path)?));
            }
            None => {
                command.stdin(Stdio::null());
            }
        }

        debug!("launching: {spec}");
        let status = command.status().map_err(|source| DockerLintError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        debug!("{} exited with {status}", spec.program);
        Ok(status.code().unwrap_or(SIGNALED_STATUS))
    }
}

/// Answers whether a program can be launched on this host.
#[cfg_attr(test, mockall::automock)]
pub trait ToolProbe {
    /// Whether `program` responds to a version query.
    fn is_available(&self, program: &str) -> bool;
}

/// Probe that runs `<program> --version` with all output discarded.
#[derive(Debug, Default, Clone)]
pub struct CommandProbe;

impl ToolProbe for CommandProbe {
    fn is_available(&self, program: &str) -> bool {
        let available = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        debug!("probe {program}: available={available}");
        available
    }
}
