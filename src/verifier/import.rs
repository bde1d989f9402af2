use async_trait::async_trait;
use log::debug;

use super::Verifier;
use crate::domain::model::{ImportCheck, PackageSpec, Verification};
use crate::error::BootstrapError;
use crate::provisioner::Environment;
use crate::runtime::{ProcessCommand, Runtime};

/// Distributions whose import name can't be derived from the package name.
const IMPORT_NAMES: &[(&str, &str)] = &[
    ("opencv-python", "cv2"),
    ("opencv-python-headless", "cv2"),
    ("pillow", "PIL"),
    ("pyjwt", "jwt"),
    ("python-dotenv", "dotenv"),
    ("flask-socketio", "flask_socketio"),
    ("scikit-learn", "sklearn"),
    ("beautifulsoup4", "bs4"),
    ("pyyaml", "yaml"),
];

/// Import names to try for a package, most likely first.
///
/// Known distributions map to their import name; anything else uses the
/// package name with dashes as underscores. The last dash-separated segment
/// and the dash-less lowercase name are tried after that.
pub fn import_candidates(package: &PackageSpec) -> Vec<String> {
    let normalized = package.normalized_name();
    let primary = IMPORT_NAMES
        .iter()
        .find(|(dist, _)| *dist == normalized)
        .map(|(_, module)| module.to_string())
        .unwrap_or_else(|| package.name().replace('-', "_"));

    let name = package.name();
    let alternates = [
        name.rsplit('-').next().unwrap_or(name).to_string(),
        name.replace('-', "").to_lowercase(),
    ];

    let mut candidates = vec![primary];
    for alt in alternates {
        if !alt.is_empty() && !candidates.contains(&alt) {
            candidates.push(alt);
        }
    }
    candidates
}

/// Checks that every configured package can be imported in the environment.
pub struct ImportVerifier<'a, R: Runtime> {
    runtime: &'a R,
    packages: Vec<PackageSpec>,
}

impl<'a, R: Runtime> ImportVerifier<'a, R> {
    pub fn new(runtime: &'a R, packages: Vec<PackageSpec>) -> Self {
        Self { runtime, packages }
    }

    /// First candidate module that imports cleanly, if any.
    async fn importable_as(
        &self,
        env: &Environment,
        candidates: &[String],
    ) -> Result<Option<String>, BootstrapError> {
        for module in candidates {
            let cmd = ProcessCommand::new(&env.interpreter)
                .arg("-c")
                .arg(format!("import {}", module))
                .capture();
            let output = self
                .runtime
                .run(&cmd)
                .await
                .map_err(|e| BootstrapError::VerifierFailed(format!("{:#}", e)))?;
            if output.success() {
                return Ok(Some(module.clone()));
            }
            debug!("import {} failed: {}", module, output.describe_failure());
        }
        Ok(None)
    }
}

#[async_trait]
impl<R: Runtime> Verifier for ImportVerifier<'_, R> {
    #[tracing::instrument(skip(self, env))]
    async fn run(&self, env: &Environment) -> Result<Verification, BootstrapError> {
        let mut checks = Vec::with_capacity(self.packages.len());
        for package in &self.packages {
            let tried = import_candidates(package);
            let module = self.importable_as(env, &tried).await?;
            checks.push(ImportCheck {
                package: package.clone(),
                module,
                tried,
            });
        }

        let missing: Vec<&str> = checks
            .iter()
            .filter(|c| !c.is_ok())
            .map(|c| c.package.name())
            .collect();

        let verification = if missing.is_empty() {
            Verification::passed(format!("all {} packages importable", checks.len()))
        } else {
            Verification::failed(format!("missing packages: {}", missing.join(", ")))
        };
        Ok(verification.with_checks(checks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, ProcessOutput};

    fn spec(name: &str) -> PackageSpec {
        name.parse().unwrap()
    }

    fn exit(code: i32) -> ProcessOutput {
        ProcessOutput {
            status: Some(code),
            ..Default::default()
        }
    }

    #[test]
    fn test_import_candidates_known_names() {
        assert_eq!(import_candidates(&spec("opencv-python"))[0], "cv2");
        assert_eq!(import_candidates(&spec("Pillow"))[0], "PIL");
        assert_eq!(import_candidates(&spec("PyJWT"))[0], "jwt");
        assert_eq!(import_candidates(&spec("python-dotenv"))[0], "dotenv");
        assert_eq!(import_candidates(&spec("Flask-SocketIO"))[0], "flask_socketio");
        assert_eq!(import_candidates(&spec("scikit-learn"))[0], "sklearn");
    }

    #[test]
    fn test_import_candidates_fallbacks() {
        assert_eq!(import_candidates(&spec("numpy")), vec!["numpy"]);
        assert_eq!(
            import_candidates(&spec("typing-extensions")),
            vec!["typing_extensions", "extensions", "typingextensions"]
        );
        assert_eq!(
            import_candidates(&spec("scikit-learn")),
            vec!["sklearn", "learn", "scikitlearn"]
        );
    }

    #[tokio::test]
    async fn test_all_importable_passes() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run()
            .withf(|cmd| cmd.args[0] == "-c" && cmd.capture)
            .times(2)
            .returning(|_| Ok(exit(0)));

        let verifier = ImportVerifier::new(&runtime, vec![spec("numpy"), spec("pillow")]);
        let result = verifier.run(&Environment::at("/work/.venv")).await.unwrap();
        assert!(result.passed);
        assert_eq!(result.detail, "all 2 packages importable");
        assert_eq!(result.checks.len(), 2);
        assert_eq!(result.checks[1].module.as_deref(), Some("PIL"));
    }

    #[tokio::test]
    async fn test_alternate_import_name_is_tried() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run()
            .withf(|cmd| cmd.args[1] == "import typing_extensions")
            .times(1)
            .returning(|_| Ok(exit(1)));
        runtime
            .expect_run()
            .withf(|cmd| cmd.args[1] == "import extensions")
            .times(1)
            .returning(|_| Ok(exit(0)));

        let verifier = ImportVerifier::new(&runtime, vec![spec("typing-extensions")]);
        let result = verifier.run(&Environment::at("/work/.venv")).await.unwrap();
        assert!(result.passed);
        assert_eq!(result.checks[0].module.as_deref(), Some("extensions"));
    }

    #[tokio::test]
    async fn test_missing_package_fails_with_names() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run()
            .withf(|cmd| cmd.args[1] == "import numpy")
            .returning(|_| Ok(exit(0)));
        runtime
            .expect_run()
            .withf(|cmd| cmd.args[1] != "import numpy")
            .returning(|_| Ok(exit(1)));

        let verifier = ImportVerifier::new(&runtime, vec![spec("numpy"), spec("scikit-learn")]);
        let result = verifier.run(&Environment::at("/work/.venv")).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.detail, "missing packages: scikit-learn");
        assert_eq!(result.exit_code, None);
        let sklearn = &result.checks[1];
        assert!(!sklearn.is_ok());
        assert_eq!(sklearn.tried, vec!["sklearn", "learn", "scikitlearn"]);
    }

    #[tokio::test]
    async fn test_interpreter_error_is_verifier_failure() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run()
            .returning(|_| Err(anyhow::anyhow!("No such file or directory")));

        let verifier = ImportVerifier::new(&runtime, vec![spec("numpy")]);
        let err = verifier.run(&Environment::at("/work/.venv")).await.unwrap_err();
        assert!(matches!(err, BootstrapError::VerifierFailed(_)));
    }
}
