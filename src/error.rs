//! Run-level error taxonomy.
//!
//! Only [`BootstrapError::EnvironmentMissing`] ever aborts a run. Install
//! failures are folded into the run report and verifier failures into the
//! exit code; their variants exist so those paths can carry a typed cause.

use thiserror::Error;

use crate::domain::model::{InstallMode, PackageSpec};

#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The isolated environment could not be created or activated.
    #[error("Environment is not available at {location}: {reason}")]
    EnvironmentMissing { location: String, reason: String },

    /// One install attempt returned non-zero or could not be started.
    #[error("Installing {package} ({mode} mode) failed: {reason}")]
    InstallAttemptFailed {
        package: PackageSpec,
        mode: InstallMode,
        reason: String,
    },

    /// The verifier could not be run or reported failure.
    #[error("Verification failed: {0}")]
    VerifierFailed(String),
}

impl BootstrapError {
    pub fn environment_missing(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvironmentMissing {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Process exit codes.
pub mod exit_code {
    /// No failed packages and the verifier passed.
    pub const SUCCESS: u8 = 0;
    /// At least one package failed, or the verifier failed.
    pub const FAILURE: u8 = 1;
    /// The environment could not be provisioned; nothing was installed.
    pub const ENVIRONMENT_MISSING: u8 = 3;
}
