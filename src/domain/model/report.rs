use super::{InstallOutcome, PackageSpec};

/// One resolved package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub package: PackageSpec,
    pub outcome: InstallOutcome,
}

/// Per-run record of every package's terminal outcome.
///
/// Entries keep resolution order. The failed set holds exactly the packages
/// recorded as [`InstallOutcome::Failed`], in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
    failed: Vec<PackageSpec>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terminal outcome of a package.
    ///
    /// Returns `false` and leaves the report untouched if the package already
    /// has an outcome; outcomes are never reassigned.
    pub(crate) fn record(&mut self, package: PackageSpec, outcome: InstallOutcome) -> bool {
        if self.outcome_of(&package).is_some() {
            return false;
        }
        if outcome.is_failed() {
            self.failed.push(package.clone());
        }
        self.entries.push(ReportEntry { package, outcome });
        true
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn failed(&self) -> &[PackageSpec] {
        &self.failed
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn outcome_of(&self, package: &PackageSpec) -> Option<InstallOutcome> {
        self.entries
            .iter()
            .find(|e| e.package.same_distribution(package))
            .map(|e| e.outcome)
    }

    pub fn count(&self, outcome: InstallOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> PackageSpec {
        name.parse().unwrap()
    }

    #[test]
    fn test_record_tracks_failed_set() {
        let mut report = RunReport::new();
        assert!(report.is_empty());
        assert!(!report.has_failures());

        assert!(report.record(spec("numpy"), InstallOutcome::Success));
        assert!(report.record(spec("scipy"), InstallOutcome::Failed));
        assert!(report.record(spec("pandas"), InstallOutcome::SuccessOnRetry));
        assert!(report.record(spec("joblib"), InstallOutcome::Failed));

        assert_eq!(report.len(), 4);
        assert!(report.has_failures());
        assert_eq!(report.failed(), &[spec("scipy"), spec("joblib")]);
        assert_eq!(report.count(InstallOutcome::Success), 1);
        assert_eq!(report.count(InstallOutcome::SuccessOnRetry), 1);
        assert_eq!(report.count(InstallOutcome::Failed), 2);
    }

    #[test]
    fn test_outcome_is_never_reassigned() {
        let mut report = RunReport::new();
        assert!(report.record(spec("numpy"), InstallOutcome::Failed));
        assert!(!report.record(spec("NumPy"), InstallOutcome::Success));

        assert_eq!(report.len(), 1);
        assert_eq!(report.outcome_of(&spec("numpy")), Some(InstallOutcome::Failed));
        assert_eq!(report.failed(), &[spec("numpy")]);
    }

    #[test]
    fn test_entries_keep_order() {
        let mut report = RunReport::new();
        report.record(spec("b"), InstallOutcome::Success);
        report.record(spec("a"), InstallOutcome::Success);
        let names: Vec<&str> = report.entries().iter().map(|e| e.package.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(report.outcome_of(&spec("c")), None);
    }
}
