//! Validated run options and the outcome of argument parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Target used when no `--dockerfile` was supplied.
pub const DEFAULT_TARGET: &str = "Dockerfile";

/// Minimum severity at which a hadolint finding fails a target.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// Only errors fail.
    Error,
    /// Warnings and errors fail.
    #[default]
    Warning,
    /// Info and above fail.
    Info,
    /// Style and above fail.
    Style,
    /// Nothing fails on findings.
    Ignore,
}

impl Threshold {
    /// Every accepted level, most severe first.
    pub const ALL: [Threshold; 5] = [
        Threshold::Error,
        Threshold::Warning,
        Threshold::Info,
        Threshold::Style,
        Threshold::Ignore,
    ];

    /// Lowercase literal passed to hadolint and written to the report.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Style => "style",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Threshold {
    type Err = String;

    /// Parses a level case-insensitively (`ERROR` and `error` are equal).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| {
                format!("expected one of error, warning, info, style, ignore (got '{value}')")
            })
    }
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    targets: Vec<String>,
    threshold: Threshold,
    strict: bool,
}

impl Options {
    /// Build options; an empty target list falls back to [`DEFAULT_TARGET`].
    pub fn new(targets: Vec<String>, threshold: Threshold, strict: bool) -> Self {
        let targets = if targets.is_empty() {
            vec![DEFAULT_TARGET.to_string()]
        } else {
            targets
        };
        Self {
            targets,
            threshold,
            strict,
        }
    }

    /// Raw targets in the order given.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Failure threshold.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Whether a missing target is a hard failure.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(Vec::new(), Threshold::default(), false)
    }
}

/// Result of turning raw command-line tokens into options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Arguments were valid.
    Parsed(Options),
    /// `--help` was present; carries the usage text.
    HelpRequested {
        /// Usage text for the diagnostic stream.
        usage: String,
    },
    /// Arguments were invalid.
    ParseError {
        /// Message naming the offending token.
        message: String,
    },
}
