//! Post-run verification.
//!
//! The verifier runs exactly once per run, after the summary. What it reports
//! is shown to the user and feeds the exit code; it never changes a package
//! outcome.

mod command;
mod import;

use async_trait::async_trait;

use crate::domain::model::Verification;
use crate::error::BootstrapError;
use crate::provisioner::Environment;

pub use command::CommandVerifier;
pub use import::{ImportVerifier, import_candidates};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Check the environment.
    ///
    /// `Ok` carries whatever the check concluded, pass or fail. `Err` means
    /// the check could not be carried out at all.
    async fn run(&self, env: &Environment) -> Result<Verification, BootstrapError>;
}
