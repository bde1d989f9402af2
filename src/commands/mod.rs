use anyhow::Result;
use log::{debug, info};
use std::io;

use crate::{
    application::Bootstrapper,
    error::{BootstrapError, exit_code},
    package_manager::PipClient,
    provisioner::VenvProvisioner,
    runtime::Runtime,
    verifier::{CommandVerifier, ImportVerifier, Verifier},
};

pub mod config;
mod paths;
mod report;
mod requirements;

pub use config::{Overrides, Settings};
pub use report::ConsoleReporter;
pub use requirements::parse_requirements;

/// Bootstrap the environment and return the process exit code.
///
/// Configuration problems are errors. Everything that happens once the run
/// has started, including an environment that can't be provisioned, is
/// reported and folded into the exit code.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn bootstrap<R: Runtime>(runtime: R, overrides: Overrides) -> Result<u8> {
    let settings = Settings::load(&runtime, overrides)?;
    debug!("Settings: {:?}", settings);

    let mut reporter = ConsoleReporter::new(io::stdout());
    reporter.plan(settings.packages.len(), &settings.venv);

    let provisioner =
        VenvProvisioner::new(&runtime, settings.python.clone(), settings.venv.clone());
    let package_manager = PipClient::new(&runtime);
    let verifier: Box<dyn Verifier + '_> = match &settings.verify_command {
        Some(argv) => {
            info!("Verifying with command {:?}", argv);
            Box::new(CommandVerifier::new(&runtime, argv.clone()))
        }
        None => Box::new(ImportVerifier::new(&runtime, settings.packages.clone())),
    };

    let bootstrapper = Bootstrapper::new(
        &provisioner,
        &package_manager,
        verifier.as_ref(),
        settings.remediation_hint.clone(),
    );

    match bootstrapper.run(&settings.packages, &mut reporter).await {
        Ok(summary) => Ok(summary.exit_code()),
        Err(e @ BootstrapError::EnvironmentMissing { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "No packages were installed. Check that {} is a working Python 3 interpreter \
                 (or pass --python), then run envboot again.",
                settings.python.display()
            );
            Ok(exit_code::ENVIRONMENT_MISSING)
        }
        Err(e) => Err(e.into()),
    }
}
