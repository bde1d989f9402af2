//! Package manager client abstraction.
//!
//! One call installs or queries exactly one package. Retrying is the
//! orchestrator's business, not the client's.

mod pip;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::model::{InstallMode, PackageInfo, PackageSpec};
use crate::error::BootstrapError;
use crate::provisioner::Environment;

pub use pip::PipClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Make a single install attempt.
    ///
    /// Every failure, whatever its cause, is reported as
    /// [`BootstrapError::InstallAttemptFailed`].
    async fn install(
        &self,
        env: &Environment,
        package: &PackageSpec,
        mode: InstallMode,
    ) -> Result<(), BootstrapError>;

    /// Read-only lookup of an installed package. `Ok(None)` means absent.
    async fn query_status(
        &self,
        env: &Environment,
        package: &PackageSpec,
    ) -> Result<Option<PackageInfo>>;
}
