use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;

use super::{Environment, EnvironmentProvisioner};
use crate::error::BootstrapError;
use crate::runtime::{ProcessCommand, Runtime};

/// Provisions a Python virtual environment with `python -m venv`.
///
/// An existing environment is reused as long as its interpreter is present.
pub struct VenvProvisioner<'a, R: Runtime> {
    runtime: &'a R,
    python: PathBuf,
    root: PathBuf,
}

impl<'a, R: Runtime> VenvProvisioner<'a, R> {
    pub fn new(runtime: &'a R, python: PathBuf, root: PathBuf) -> Self {
        Self {
            runtime,
            python,
            root,
        }
    }

    fn missing(&self, reason: impl Into<String>) -> BootstrapError {
        BootstrapError::environment_missing(self.root.display().to_string(), reason)
    }
}

#[async_trait]
impl<R: Runtime> EnvironmentProvisioner for VenvProvisioner<'_, R> {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn ensure_environment(&self) -> Result<Environment, BootstrapError> {
        let env = Environment::at(&self.root);

        if self.runtime.is_file(&env.interpreter) {
            info!("Reusing environment at {:?}", env.root);
            return Ok(env);
        }

        info!("Creating environment at {:?}", env.root);
        let cmd = ProcessCommand::new(&self.python)
            .args(["-m", "venv"])
            .arg(self.root.display().to_string())
            .capture();
        debug!("Running {}", cmd);

        let output = self
            .runtime
            .run(&cmd)
            .await
            .map_err(|e| self.missing(format!("{:#}", e)))?;

        if !output.success() {
            return Err(self.missing(format!(
                "{} -m venv failed ({})",
                self.python.display(),
                output.describe_failure()
            )));
        }

        if !self.runtime.is_file(&env.interpreter) {
            return Err(self.missing(format!(
                "interpreter not found at {}",
                env.interpreter.display()
            )));
        }

        info!("Created environment at {:?}", env.root);
        Ok(env.newly_created())
    }
}
