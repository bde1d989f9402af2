use super::PackageSpec;

/// Result of trying to import one package during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCheck {
    pub package: PackageSpec,
    /// Module that imported, `None` if every candidate failed.
    pub module: Option<String>,
    /// Every module name that was tried, in order.
    pub tried: Vec<String>,
}

impl ImportCheck {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }
}

/// What the verifier reported. Surfaced to the user, never used to change
/// package outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub passed: bool,
    /// Exit code of the verifier process, when there was one.
    pub exit_code: Option<i32>,
    pub detail: String,
    /// Per-package import results, when the verifier checked imports.
    pub checks: Vec<ImportCheck>,
}

impl Verification {
    pub fn passed(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            exit_code: None,
            detail: detail.into(),
            checks: Vec::new(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            exit_code: None,
            detail: detail.into(),
            checks: Vec::new(),
        }
    }

    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_checks(mut self, checks: Vec<ImportCheck>) -> Self {
        self.checks = checks;
        self
    }
}
