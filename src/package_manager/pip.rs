use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use super::PackageManager;
use crate::domain::model::{InstallMode, PackageInfo, PackageSpec};
use crate::error::BootstrapError;
use crate::provisioner::Environment;
use crate::runtime::{ProcessCommand, Runtime};

/// Drives `pip` through the environment's own interpreter.
pub struct PipClient<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> PipClient<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    fn pip(&self, env: &Environment) -> ProcessCommand {
        ProcessCommand::new(&env.interpreter)
            .args(["-m", "pip"])
            .env("PIP_DISABLE_PIP_VERSION_CHECK", "1")
            .env("PIP_NO_INPUT", "1")
    }

    fn install_command(
        &self,
        env: &Environment,
        package: &PackageSpec,
        mode: InstallMode,
    ) -> ProcessCommand {
        let cmd = self.pip(env).arg("install");
        let cmd = if mode.prefers_binary() {
            cmd.arg("--prefer-binary")
        } else {
            cmd
        };
        cmd.arg(package.name())
    }
}

#[async_trait]
impl<R: Runtime> PackageManager for PipClient<'_, R> {
    #[tracing::instrument(skip(self, env, package), fields(package = %package))]
    async fn install(
        &self,
        env: &Environment,
        package: &PackageSpec,
        mode: InstallMode,
    ) -> Result<(), BootstrapError> {
        let cmd = self.install_command(env, package, mode);
        debug!("Running {}", cmd);

        let failed = |reason: String| BootstrapError::InstallAttemptFailed {
            package: package.clone(),
            mode,
            reason,
        };

        let output = self
            .runtime
            .run(&cmd)
            .await
            .map_err(|e| failed(format!("{:#}", e)))?;

        if output.success() {
            Ok(())
        } else {
            Err(failed(output.describe_failure()))
        }
    }

    #[tracing::instrument(skip(self, env, package), fields(package = %package))]
    async fn query_status(
        &self,
        env: &Environment,
        package: &PackageSpec,
    ) -> Result<Option<PackageInfo>> {
        let cmd = self.pip(env).arg("show").arg(package.name()).capture();
        let output = self
            .runtime
            .run(&cmd)
            .await
            .with_context(|| format!("Failed to query status of {}", package))?;

        if output.success() {
            return Ok(Some(parse_show_output(&output.stdout)));
        }

        if output.stderr.contains("No module named pip") {
            anyhow::bail!("pip is not available in {}", env.root.display());
        }

        debug!("{} not installed: {}", package, output.describe_failure());
        Ok(None)
    }
}

/// Pull version and location out of `pip show` output.
fn parse_show_output(stdout: &str) -> PackageInfo {
    let mut info = PackageInfo::default();
    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "Version" => info.version = Some(value.to_string()),
            "Location" => info.location = Some(value.to_string()),
            _ => {}
        }
    }
    info
}
