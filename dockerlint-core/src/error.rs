//! Error types for host-level faults.
//!
//! Expected outcomes (usage, bad arguments, missing targets, no runner, lint
//! findings) are not errors; they travel as values through the executor.

use std::{error::Error, fmt, io};

/// Error type for unexpected host failures.
#[derive(Debug)]
pub enum DockerLintError {
    /// An underlying I/O error.
    Io(io::Error),
    /// An external program could not be started.
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying launch error.
        source: io::Error,
    },
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for DockerLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Spawn { program, source } => write!(f, "failed to launch {program}: {source}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for DockerLintError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Spawn { source, .. } => Some(source),
            Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for DockerLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Convenience result type for dockerlint core.
pub type Result<T> = std::result::Result<T, DockerLintError>;
