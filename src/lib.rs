pub mod application;
pub mod commands;
pub mod domain;
pub mod error;
pub mod package_manager;
pub mod provisioner;
pub mod runtime;
pub mod verifier;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    /// Returns the working directory used by tests.
    /// - Unix: `/home/user/work`
    /// - Windows: `C:\Users\user\work`
    pub fn test_work_dir() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user/work")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user\work")
        }
    }

    /// Returns the user configuration directory used by tests.
    /// - Unix: `/home/user/.config`
    /// - Windows: `C:\Users\user\AppData\Roaming`
    pub fn test_config_dir() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user/.config")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user\AppData\Roaming")
        }
    }

    /// Configure a mock runtime with common defaults for tests.
    /// - current_dir set to [`test_work_dir`]
    /// - config dir set to [`test_config_dir`]
    /// - PATH env set to a plain system path
    pub fn configure_mock_runtime_basics(runtime: &mut MockRuntime) {
        runtime.expect_current_dir().returning(|| Ok(test_work_dir()));

        runtime
            .expect_config_dir()
            .returning(|| Some(test_config_dir()));

        runtime
            .expect_env_var()
            .with(eq("PATH"))
            .returning(|_| Ok("/usr/bin".to_string()));
    }
}
