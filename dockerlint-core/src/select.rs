//! Choice between the local hadolint binary and the container fallback.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Strategy chosen for invoking hadolint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerChoice {
    /// Run the locally installed executable.
    Binary,
    /// Run hadolint inside a container.
    Container,
    /// Neither strategy is usable.
    Unavailable {
        /// Human-readable explanation naming both missing capabilities.
        reason: String,
    },
}

/// Runner tag written to the report.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunnerId {
    /// Local executable.
    Binary,
    /// Container runtime.
    Docker,
    /// No runner executed.
    #[default]
    Unknown,
}

impl RunnerId {
    /// Lowercase tag as it appears in the report.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Docker => "docker",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick a runner from two availability answers. The binary always wins.
pub fn select(binary_available: bool, container_available: bool) -> RunnerChoice {
    match (binary_available, container_available) {
        (true, _) => RunnerChoice::Binary,
        (false, true) => RunnerChoice::Container,
        (false, false) => RunnerChoice::Unavailable {
            reason: "neither the hadolint executable nor a container runtime is available"
                .to_string(),
        },
    }
}
