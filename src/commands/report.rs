use log::debug;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::application::Reporter;
use crate::domain::model::{
    InstallMode, InstallOutcome, PackageSpec, ReportEntry, RunReport, StatusEntry, Verification,
};
use crate::error::BootstrapError;
use crate::provisioner::Environment;

/// Writes run progress and the final report as plain text.
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    status_header_written: bool,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status_header_written: false,
        }
    }

    /// Announce what the run is about to do.
    pub fn plan(&mut self, package_count: usize, venv: &Path) {
        self.line(format_args!(
            "   bootstrapping {} packages into {}",
            package_count,
            venv.display()
        ));
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        // Output is best-effort; a closed stdout must not stop the run.
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            debug!("Failed to write report line: {}", e);
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn environment_ready(&mut self, env: &Environment) {
        if env.created {
            self.line(format_args!("   created environment {}", env.root.display()));
        } else {
            self.line(format_args!("   using environment {}", env.root.display()));
        }
    }

    fn package_started(&mut self, package: &PackageSpec, index: usize, total: usize) {
        self.line(format_args!("[{}/{}] {}", index, total, package));
    }

    fn attempt_failed(&mut self, error: &BootstrapError) {
        match error {
            BootstrapError::InstallAttemptFailed {
                mode: InstallMode::Preferred,
                reason,
                ..
            } => self.line(format_args!(
                "   preferred install failed ({}), retrying without binary preference",
                reason
            )),
            BootstrapError::InstallAttemptFailed { reason, .. } => {
                self.line(format_args!("   fallback install failed ({})", reason))
            }
            other => self.line(format_args!("   {}", other)),
        }
    }

    fn package_resolved(&mut self, entry: &ReportEntry) {
        self.line(format_args!("   {} {}", entry.package, entry.outcome));
    }

    fn status(&mut self, entry: &StatusEntry) {
        if !self.status_header_written {
            self.status_header_written = true;
            self.line(format_args!("\nPackage status:"));
        }
        self.line(format_args!("   {} {}", entry.package, entry.status));
    }

    fn summary(&mut self, report: &RunReport, hint: Option<&str>) {
        self.line(format_args!(
            "\nSummary: {} installed, {} installed on retry, {} failed",
            report.count(InstallOutcome::Success),
            report.count(InstallOutcome::SuccessOnRetry),
            report.count(InstallOutcome::Failed),
        ));

        if report.has_failures() {
            let names: Vec<&str> = report.failed().iter().map(|p| p.name()).collect();
            self.line(format_args!("Failed packages: {}", names.join(", ")));
            if let Some(hint) = hint {
                self.line(format_args!("{}", hint));
            }
        } else if report.is_empty() {
            self.line(format_args!("No packages to install."));
        } else {
            self.line(format_args!("All {} packages installed.", report.len()));
        }
    }

    fn verification(&mut self, verification: &Verification) {
        if !verification.checks.is_empty() {
            self.line(format_args!("\nImport check:"));
        }
        for check in &verification.checks {
            match &check.module {
                Some(module) => {
                    self.line(format_args!("   ok       {} (import {})", check.package, module))
                }
                None => self.line(format_args!(
                    "   missing  {} (tried: {})",
                    check.package,
                    check.tried.join(", ")
                )),
            }
        }

        if verification.passed {
            self.line(format_args!("\nVerification passed: {}", verification.detail));
        } else {
            self.line(format_args!("\nVerification FAILED: {}", verification.detail));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ImportCheck, PackageInfo, PackageStatus};

    fn spec(name: &str) -> PackageSpec {
        name.parse().unwrap()
    }

    fn output(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_progress_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.package_started(&spec("scipy"), 2, 5);
        reporter.attempt_failed(&BootstrapError::InstallAttemptFailed {
            package: spec("scipy"),
            mode: InstallMode::Preferred,
            reason: "exit code 1".to_string(),
        });
        reporter.package_resolved(&ReportEntry {
            package: spec("scipy"),
            outcome: InstallOutcome::SuccessOnRetry,
        });

        assert_eq!(
            output(reporter),
            "[2/5] scipy\n   preferred install failed (exit code 1), retrying without binary preference\n   scipy installed on retry\n"
        );
    }

    #[test]
    fn test_status_header_written_once() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.status(&StatusEntry {
            package: spec("numpy"),
            status: PackageStatus::Installed(PackageInfo {
                version: Some("1.26.4".to_string()),
                location: None,
            }),
        });
        reporter.status(&StatusEntry {
            package: spec("scipy"),
            status: PackageStatus::Absent,
        });

        assert_eq!(
            output(reporter),
            "\nPackage status:\n   numpy 1.26.4\n   scipy not installed\n"
        );
    }

    #[test]
    fn test_summary_with_failures_shows_names_and_hint() {
        let mut report = RunReport::new();
        report.record(spec("numpy"), InstallOutcome::Success);
        report.record(spec("scipy"), InstallOutcome::Failed);
        report.record(spec("scikit-learn"), InstallOutcome::Failed);

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.summary(&report, Some("Install a compiler."));

        let out = output(reporter);
        assert!(out.contains("Summary: 1 installed, 0 installed on retry, 2 failed"));
        assert!(out.contains("Failed packages: scipy, scikit-learn"));
        assert!(out.contains("Install a compiler."));
    }

    #[test]
    fn test_summary_all_clear() {
        let mut report = RunReport::new();
        report.record(spec("numpy"), InstallOutcome::Success);
        report.record(spec("scipy"), InstallOutcome::SuccessOnRetry);

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.summary(&report, None);

        let out = output(reporter);
        assert!(out.contains("All 2 packages installed."));
        assert!(!out.contains("Failed packages"));
    }

    #[test]
    fn test_plan_and_environment_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.plan(3, Path::new("/work/.venv"));
        reporter.environment_ready(&Environment::at("/work/.venv").newly_created());
        reporter.environment_ready(&Environment::at("/work/.venv"));

        let root = Environment::at("/work/.venv").root;
        assert_eq!(
            output(reporter),
            format!(
                "   bootstrapping 3 packages into {0}\n   created environment {0}\n   using environment {0}\n",
                root.display()
            )
        );
    }

    #[test]
    fn test_import_checks_listed_before_verdict() {
        let verification = Verification::failed("missing packages: scikit-learn").with_checks(vec![
            ImportCheck {
                package: spec("pillow"),
                module: Some("PIL".to_string()),
                tried: vec!["PIL".to_string()],
            },
            ImportCheck {
                package: spec("scikit-learn"),
                module: None,
                tried: vec!["sklearn".to_string(), "learn".to_string()],
            },
        ]);

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.verification(&verification);

        assert_eq!(
            output(reporter),
            "\nImport check:\n   ok       pillow (import PIL)\n   missing  scikit-learn (tried: sklearn, learn)\n\nVerification FAILED: missing packages: scikit-learn\n"
        );
    }

    #[test]
    fn test_verification_lines() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.verification(&Verification::passed("all 3 packages importable"));
        reporter.verification(&Verification::failed("check.py failed (exit code 2)"));

        let out = output(reporter);
        assert!(out.contains("Verification passed: all 3 packages importable"));
        assert!(out.contains("Verification FAILED: check.py failed (exit code 2)"));
    }
}
