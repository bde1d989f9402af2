//! Isolated environment provisioning.
//!
//! A provisioner makes sure the environment packages get installed into
//! exists and hands back the interpreter to drive it with.

mod venv;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;

pub use venv::VenvProvisioner;

/// A ready-to-use isolated environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub root: PathBuf,
    pub interpreter: PathBuf,
    /// Whether this run created the environment rather than reusing it.
    pub created: bool,
}

impl Environment {
    /// The environment rooted at `root`, with the interpreter where a
    /// virtual environment places it on this platform.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let interpreter = interpreter_path(&root);
        Self {
            root,
            interpreter,
            created: false,
        }
    }

    pub fn newly_created(mut self) -> Self {
        self.created = true;
        self
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> &Path {
        self.interpreter.parent().unwrap_or(&self.root)
    }
}

#[cfg(windows)]
fn interpreter_path(root: &Path) -> PathBuf {
    root.join("Scripts").join("python.exe")
}

#[cfg(not(windows))]
fn interpreter_path(root: &Path) -> PathBuf {
    root.join("bin").join("python")
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnvironmentProvisioner: Send + Sync {
    /// Create the environment if needed and return it.
    ///
    /// Any failure is [`BootstrapError::EnvironmentMissing`].
    async fn ensure_environment(&self) -> Result<Environment, BootstrapError>;
}
