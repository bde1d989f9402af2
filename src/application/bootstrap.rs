//! Bootstrap use case - the install orchestration loop.
//!
//! For one run this:
//! - provisions the environment (the only step allowed to abort the run)
//! - resolves every package with a preferred attempt and at most one fallback
//! - queries the status of every package, best-effort
//! - emits the summary, then runs the verifier exactly once

use log::{debug, info, warn};

use crate::domain::model::{
    InstallMode, InstallOutcome, PackageSpec, PackageStatus, ReportEntry, RunReport, StatusEntry,
    Verification, dedup_packages,
};
use crate::error::{BootstrapError, exit_code};
use crate::package_manager::PackageManager;
use crate::provisioner::{Environment, EnvironmentProvisioner};
use crate::verifier::Verifier;

/// Receives run events as they happen, so output can be shown in order.
pub trait Reporter: Send {
    fn environment_ready(&mut self, env: &Environment);
    fn package_started(&mut self, package: &PackageSpec, index: usize, total: usize);
    fn attempt_failed(&mut self, error: &BootstrapError);
    fn package_resolved(&mut self, entry: &ReportEntry);
    fn status(&mut self, entry: &StatusEntry);
    /// `hint` is only given when the failed set is non-empty.
    fn summary(&mut self, report: &RunReport, hint: Option<&str>);
    fn verification(&mut self, verification: &Verification);
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report: RunReport,
    pub statuses: Vec<StatusEntry>,
    pub verification: Verification,
}

impl RunSummary {
    /// `0` iff nothing failed and the verifier passed.
    pub fn exit_code(&self) -> u8 {
        if !self.report.has_failures() && self.verification.passed {
            exit_code::SUCCESS
        } else {
            exit_code::FAILURE
        }
    }
}

pub struct Bootstrapper<'a> {
    provisioner: &'a dyn EnvironmentProvisioner,
    package_manager: &'a dyn PackageManager,
    verifier: &'a dyn Verifier,
    remediation_hint: String,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        provisioner: &'a dyn EnvironmentProvisioner,
        package_manager: &'a dyn PackageManager,
        verifier: &'a dyn Verifier,
        remediation_hint: impl Into<String>,
    ) -> Self {
        Self {
            provisioner,
            package_manager,
            verifier,
            remediation_hint: remediation_hint.into(),
        }
    }

    /// Run the whole bootstrap for `packages`.
    ///
    /// Returns `Err` only for [`BootstrapError::EnvironmentMissing`], in which
    /// case no install was attempted.
    #[tracing::instrument(skip(self, packages, reporter))]
    pub async fn run(
        &self,
        packages: &[PackageSpec],
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, BootstrapError> {
        let env = self.provisioner.ensure_environment().await?;
        reporter.environment_ready(&env);

        let report = self.install_all(&env, packages, reporter).await;
        let statuses = self.query_statuses(&env, &report, reporter).await;

        let hint = report
            .has_failures()
            .then_some(self.remediation_hint.as_str());
        reporter.summary(&report, hint);

        let verification = self.verify(&env).await;
        reporter.verification(&verification);

        Ok(RunSummary {
            report,
            statuses,
            verification,
        })
    }

    /// Resolve every package in order. Never fails: failures become report state.
    pub async fn install_all(
        &self,
        env: &Environment,
        packages: &[PackageSpec],
        reporter: &mut dyn Reporter,
    ) -> RunReport {
        let packages = dedup_packages(packages.iter().cloned());
        let total = packages.len();
        let mut report = RunReport::new();

        for (index, package) in packages.into_iter().enumerate() {
            reporter.package_started(&package, index + 1, total);
            let outcome = self.resolve_package(env, &package, reporter).await;
            info!("{}: {}", package, outcome);

            let entry = ReportEntry {
                package: package.clone(),
                outcome,
            };
            reporter.package_resolved(&entry);
            report.record(package, outcome);
        }

        report
    }

    /// Preferred attempt, then at most one fallback attempt.
    async fn resolve_package(
        &self,
        env: &Environment,
        package: &PackageSpec,
        reporter: &mut dyn Reporter,
    ) -> InstallOutcome {
        match self
            .package_manager
            .install(env, package, InstallMode::Preferred)
            .await
        {
            Ok(()) => return InstallOutcome::Success,
            Err(e) => {
                warn!("{}", e);
                reporter.attempt_failed(&e);
            }
        }

        match self
            .package_manager
            .install(env, package, InstallMode::Fallback)
            .await
        {
            Ok(()) => InstallOutcome::SuccessOnRetry,
            Err(e) => {
                warn!("{}", e);
                reporter.attempt_failed(&e);
                InstallOutcome::Failed
            }
        }
    }

    async fn query_statuses(
        &self,
        env: &Environment,
        report: &RunReport,
        reporter: &mut dyn Reporter,
    ) -> Vec<StatusEntry> {
        let mut statuses = Vec::with_capacity(report.len());
        for entry in report.entries() {
            let status = match self.package_manager.query_status(env, &entry.package).await {
                Ok(Some(info)) => PackageStatus::Installed(info),
                Ok(None) => PackageStatus::Absent,
                Err(e) => {
                    debug!("Status query for {} failed: {:#}", entry.package, e);
                    PackageStatus::Unavailable {
                        reason: format!("{:#}", e),
                    }
                }
            };
            let status_entry = StatusEntry {
                package: entry.package.clone(),
                status,
            };
            reporter.status(&status_entry);
            statuses.push(status_entry);
        }
        statuses
    }

    async fn verify(&self, env: &Environment) -> Verification {
        match self.verifier.run(env).await {
            Ok(verification) => verification,
            Err(e) => {
                warn!("{}", e);
                Verification::failed(e.to_string())
            }
        }
    }
}
