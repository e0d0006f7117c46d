//! The two ways of invoking hadolint against a single Dockerfile.

use std::path::Path;

use crate::config::RunnerConfig;
use crate::error::Result;
use crate::options::Threshold;
use crate::process::{CommandSpec, ProcessLauncher};
use crate::select::{RunnerChoice, RunnerId};

/// Reads hadolint's input from stdin when passed as the file argument.
const STDIN_MARKER: &str = "-";

/// Something that can lint one target at a threshold.
pub trait Runner {
    /// Tag reported in the result.
    fn id(&self) -> RunnerId;
    /// The command that lints `target`.
    fn command(&self, target: &Path, threshold: Threshold) -> CommandSpec;
    /// Human-readable command line, for diagnostics only.
    fn command_description(&self, target: &Path, threshold: Threshold) -> String {
        self.command(target, threshold).to_string()
    }
    /// Lint `target`; `0` means accepted, anything else means findings at or
    /// above `threshold` or a tool failure.
    fn execute(&self, target: &Path, threshold: Threshold) -> Result<i32>;
}

/// Runs a locally installed hadolint against the file path.
pub struct BinaryRunner<'a> {
    program: String,
    launcher: &'a dyn ProcessLauncher,
}

impl<'a> BinaryRunner<'a> {
    /// Create a runner for `program`.
    pub fn new(program: impl Into<String>, launcher: &'a dyn ProcessLauncher) -> Self {
        Self {
            program: program.into(),
            launcher,
        }
    }
}

impl Runner for BinaryRunner<'_> {
    fn id(&self) -> RunnerId {
        RunnerId::Binary
    }

    fn command(&self, target: &Path, threshold: Threshold) -> CommandSpec {
        CommandSpec::new(
            self.program.clone(),
            vec![
                "--failure-threshold".to_string(),
                threshold.to_string(),
                target.display().to_string(),
            ],
        )
    }

    fn execute(&self, target: &Path, threshold: Threshold) -> Result<i32> {
        self.launcher.run(&self.command(target, threshold))
    }
}

/// Runs hadolint in a throwaway container, feeding the file through stdin.
pub struct ContainerRunner<'a> {
    runtime: String,
    image: String,
    launcher: &'a dyn ProcessLauncher,
}

impl<'a> ContainerRunner<'a> {
    /// Create a runner using `runtime` to start `image`.
    pub fn new(
        runtime: impl Into<String>,
        image: impl Into<String>,
        launcher: &'a dyn ProcessLauncher,
    ) -> Self {
        Self {
            runtime: runtime.into(),
            image: image.into(),
            launcher,
        }
    }
}

impl Runner for ContainerRunner<'_> {
    fn id(&self) -> RunnerId {
        RunnerId::Docker
    }

    fn command(&self, target: &Path, threshold: Threshold) -> CommandSpec {
        CommandSpec::new(
            self.runtime.clone(),
            vec![
                "run".to_string(),
                "--rm".to_string(),
                "-i".to_string(),
                self.image.clone(),
                "hadolint".to_string(),
                "--failure-threshold".to_string(),
                threshold.to_string(),
                STDIN_MARKER.to_string(),
            ],
        )
        .with_stdin(target)
    }

    fn execute(&self, target: &Path, threshold: Threshold) -> Result<i32> {
        self.launcher.run(&self.command(target, threshold))
    }
}

/// Closed set of runner strategies.
pub enum LintRunner<'a> {
    /// Local executable.
    Binary(BinaryRunner<'a>),
    /// Container fallback.
    Container(ContainerRunner<'a>),
}

impl<'a> LintRunner<'a> {
    /// Build the runner for a selection; `None` when nothing is available.
    pub fn from_choice(
        choice: &RunnerChoice,
        config: &RunnerConfig,
        launcher: &'a dyn ProcessLauncher,
    ) -> Option<Self> {
        match choice {
            RunnerChoice::Binary => Some(Self::Binary(BinaryRunner::new(
                config.binary.clone(),
                launcher,
            ))),
            RunnerChoice::Container => Some(Self::Container(ContainerRunner::new(
                config.container_runtime.clone(),
                config.image.clone(),
                launcher,
            ))),
            RunnerChoice::Unavailable { .. } => None,
        }
    }

    fn inner(&self) -> &dyn Runner {
        match self {
            Self::Binary(runner) => runner,
            Self::Container(runner) => runner,
        }
    }
}

impl Runner for LintRunner<'_> {
    fn id(&self) -> RunnerId {
        self.inner().id()
    }

    fn command(&self, target: &Path, threshold: Threshold) -> CommandSpec {
        self.inner().command(target, threshold)
    }

    fn execute(&self, target: &Path, threshold: Threshold) -> Result<i32> {
        self.inner().execute(target, threshold)
    }
}
