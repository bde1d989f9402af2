use async_trait::async_trait;
use log::info;
use std::env;
use std::path::PathBuf;

use super::Verifier;
use crate::domain::model::Verification;
use crate::error::BootstrapError;
use crate::provisioner::Environment;
use crate::runtime::{ProcessCommand, Runtime};

/// Runs an external check script with the environment activated.
///
/// Activation here means what a venv `activate` script does: `VIRTUAL_ENV`
/// is set and the environment's executables come first on `PATH`.
pub struct CommandVerifier<'a, R: Runtime> {
    runtime: &'a R,
    argv: Vec<String>,
}

impl<'a, R: Runtime> CommandVerifier<'a, R> {
    pub fn new(runtime: &'a R, argv: Vec<String>) -> Self {
        Self { runtime, argv }
    }

    fn command(&self, env: &Environment) -> Result<ProcessCommand, BootstrapError> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| BootstrapError::VerifierFailed("empty verify command".to_string()))?;

        let mut paths = vec![env.bin_dir().to_path_buf()];
        if let Ok(current) = self.runtime.env_var("PATH") {
            paths.extend(env::split_paths(&current));
        }
        let path = env::join_paths(paths)
            .map_err(|e| BootstrapError::VerifierFailed(format!("cannot build PATH: {}", e)))?;

        Ok(ProcessCommand::new(PathBuf::from(program))
            .args(args.iter().cloned())
            .env("VIRTUAL_ENV", env.root.display().to_string())
            .env("PATH", path.to_string_lossy().into_owned()))
    }
}

#[async_trait]
impl<R: Runtime> Verifier for CommandVerifier<'_, R> {
    #[tracing::instrument(skip(self, env))]
    async fn run(&self, env: &Environment) -> Result<Verification, BootstrapError> {
        let cmd = self.command(env)?;
        info!("Running verifier {}", cmd);

        let output = self
            .runtime
            .run(&cmd)
            .await
            .map_err(|e| BootstrapError::VerifierFailed(format!("{:#}", e)))?;

        let verification = if output.success() {
            Verification::passed(format!("{} succeeded", self.argv.join(" ")))
        } else {
            Verification::failed(format!(
                "{} failed ({})",
                self.argv.join(" "),
                output.describe_failure()
            ))
        };
        Ok(verification.with_exit_code(output.status))
    }
}
