use std::fmt;

/// How a package install is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallMode {
    /// Favor precompiled artifacts over building from source.
    Preferred,
    /// No binary preference; only used after a preferred attempt failed.
    Fallback,
}

impl InstallMode {
    pub fn prefers_binary(self) -> bool {
        matches!(self, InstallMode::Preferred)
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallMode::Preferred => f.write_str("preferred"),
            InstallMode::Fallback => f.write_str("fallback"),
        }
    }
}

/// Terminal result of resolving one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallOutcome {
    Success,
    SuccessOnRetry,
    Failed,
}

impl InstallOutcome {
    pub fn is_failed(self) -> bool {
        matches!(self, InstallOutcome::Failed)
    }

    /// Number of install attempts that led to this outcome.
    pub fn attempts(self) -> usize {
        match self {
            InstallOutcome::Success => 1,
            InstallOutcome::SuccessOnRetry | InstallOutcome::Failed => 2,
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Success => f.write_str("installed"),
            InstallOutcome::SuccessOnRetry => f.write_str("installed on retry"),
            InstallOutcome::Failed => f.write_str("failed"),
        }
    }
}
