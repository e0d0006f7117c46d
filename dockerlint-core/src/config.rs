//! Runner configuration sourced from the environment.

/// Names of the programs and image used to invoke hadolint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Executable name or path of the local hadolint binary.
    pub binary: String,
    /// Container runtime executable (docker, podman, ...).
    pub container_runtime: String,
    /// Image that ships hadolint.
    pub image: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: "hadolint".to_string(),
            container_runtime: "docker".to_string(),
            image: "hadolint/hadolint".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration, falling back to defaults for unset or blank values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };
        Self {
            binary: read("DOCKERLINT_HADOLINT_BIN", defaults.binary),
            container_runtime: read("DOCKERLINT_CONTAINER_RUNTIME", defaults.container_runtime),
            image: read("DOCKERLINT_HADOLINT_IMAGE", defaults.image),
        }
    }
}
