//! Target path resolution.

use std::path::{Component, Path, PathBuf};

use crate::options::Options;

/// Targets split by whether they exist, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveResult {
    /// Normalized absolute paths that exist.
    pub existing: Vec<PathBuf>,
    /// Normalized absolute paths that do not exist.
    pub missing: Vec<PathBuf>,
}

/// Turns raw target strings into absolute paths relative to a base directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Create a resolver anchored at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Partition the option targets by `exists`.
    ///
    /// Duplicated targets stay duplicated; order within each list follows
    /// the input.
    pub fn resolve<F>(&self, options: &Options, exists: F) -> ResolveResult
    where
        F: Fn(&Path) -> bool,
    {
        let mut result = ResolveResult::default();
        for raw in options.targets() {
            let path = self.normalize(raw);
            if exists(&path) {
                result.existing.push(path);
            } else {
                result.missing.push(path);
            }
        }
        result
    }

    /// Absolute, lexically normalized form of `raw`.
    pub fn normalize(&self, raw: &str) -> PathBuf {
        let joined = self.base_dir.join(raw);
        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                // `pop` is a no-op at the root, which is where `..` stops.
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }
        normalized
    }
}
