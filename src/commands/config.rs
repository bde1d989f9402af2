use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::model::{PackageSpec, dedup_packages};
use crate::runtime::Runtime;

use super::paths::{DEFAULT_PYTHON, DEFAULT_VENV_DIR, absolutize, find_config_file, resolve_against};
use super::requirements::parse_requirements;

/// Packages installed when no list is configured. Order is display order;
/// scikit-learn comes after the numeric stack it builds on.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "numpy",
    "scipy",
    "pandas",
    "joblib",
    "threadpoolctl",
    "scikit-learn",
    "flask",
    "requests",
    "sqlalchemy",
    "jinja2",
    "pillow",
    "opencv-python",
    "pyjwt",
    "python-dotenv",
];

#[cfg(windows)]
pub const DEFAULT_REMEDIATION_HINT: &str = "Packages that failed usually need a C/C++ compiler to build from source. \
Install \"Microsoft C++ Build Tools\" (https://visualstudio.microsoft.com/visual-cpp-build-tools/) \
with the \"Desktop development with C++\" workload, then run envboot again.";

#[cfg(not(windows))]
pub const DEFAULT_REMEDIATION_HINT: &str = "Packages that failed usually need a C/C++ compiler and Python headers to build from source. \
Install your platform's build toolchain (e.g. `build-essential python3-dev` on Debian/Ubuntu, \
`xcode-select --install` on macOS), then run envboot again.";

/// The on-disk configuration file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub python: Option<PathBuf>,
    #[serde(default)]
    pub venv: Option<PathBuf>,
    #[serde(default)]
    pub packages: Option<Vec<PackageSpec>>,
    #[serde(default)]
    pub requirements: Option<PathBuf>,
    /// Packages moved to the end of the run, in this order.
    #[serde(default)]
    pub defer: Vec<PackageSpec>,
    #[serde(default)]
    pub verify_command: Option<Vec<String>>,
    #[serde(default)]
    pub remediation_hint: Option<String>,
}

/// Values given on the command line (or via `ENVBOOT_*`), which take
/// precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub venv: Option<PathBuf>,
    pub requirements: Option<PathBuf>,
    pub verify_command: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Interpreter used to create the environment.
    pub python: PathBuf,
    /// Absolute environment directory.
    pub venv: PathBuf,
    pub packages: Vec<PackageSpec>,
    /// External verifier command line. `None` selects the import check.
    pub verify_command: Option<Vec<String>>,
    pub remediation_hint: String,
    /// Config file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

impl Settings {
    #[tracing::instrument(skip(runtime, overrides))]
    pub fn load<R: Runtime>(runtime: &R, overrides: Overrides) -> Result<Self> {
        let source = find_config_file(runtime, overrides.config.as_deref())?;
        let file = match &source {
            Some(path) => {
                info!("Using config file {:?}", path);
                let content = runtime.read_to_string(path)?;
                serde_json::from_str::<ConfigFile>(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => {
                debug!("No config file found, using defaults");
                ConfigFile::default()
            }
        };
        let file_dir = source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf);

        // Relative paths from the file resolve against the file's directory,
        // everything else against the working directory.
        let from_file = |path: &Path| -> Result<PathBuf> {
            match &file_dir {
                Some(dir) => Ok(resolve_against(dir, path)),
                None => absolutize(runtime, path),
            }
        };

        // A bare interpreter name is left for PATH lookup.
        let python = match (overrides.python, &file.python) {
            (Some(path), _) => path,
            (None, Some(path)) if path.components().count() > 1 => from_file(path)?,
            (None, Some(path)) => path.clone(),
            (None, None) => PathBuf::from(DEFAULT_PYTHON),
        };

        let venv = match (&overrides.venv, &file.venv) {
            (Some(path), _) => absolutize(runtime, path)?,
            (None, Some(path)) => from_file(path)?,
            (None, None) => absolutize(runtime, Path::new(DEFAULT_VENV_DIR))?,
        };

        let requirements = match (&overrides.requirements, &file.requirements) {
            (Some(path), _) => Some(absolutize(runtime, path)?),
            (None, Some(path)) => Some(from_file(path)?),
            (None, None) => None,
        };

        let packages = match (requirements, file.packages.clone()) {
            (Some(path), listed) => {
                if listed.is_some() {
                    warn!("Both a requirements file and a package list are configured; using {}", path.display());
                }
                info!("Reading packages from {:?}", path);
                let content = runtime.read_to_string(&path)?;
                parse_requirements(&content)
                    .with_context(|| format!("Invalid requirements file {}", path.display()))?
            }
            (None, Some(listed)) => listed,
            (None, None) => default_packages()?,
        };
        let packages = defer_packages(dedup_packages(packages), &file.defer);
        if packages.is_empty() {
            warn!("The package list is empty");
        }

        let verify_command = match overrides.verify_command {
            Some(line) => Some(split_command_line(&line)?),
            None => match file.verify_command {
                Some(argv) if argv.is_empty() => anyhow::bail!("verify_command cannot be empty."),
                other => other,
            },
        };

        let remediation_hint = file
            .remediation_hint
            .unwrap_or_else(|| DEFAULT_REMEDIATION_HINT.to_string());

        Ok(Settings {
            python,
            venv,
            packages,
            verify_command,
            remediation_hint,
            source,
        })
    }
}

pub fn default_packages() -> Result<Vec<PackageSpec>> {
    DEFAULT_PACKAGES.iter().map(|name| name.parse()).collect()
}

/// Move the deferred packages to the end, in the order they are deferred.
/// Deferring a package that isn't in the list has no effect.
fn defer_packages(packages: Vec<PackageSpec>, defer: &[PackageSpec]) -> Vec<PackageSpec> {
    let (deferred, mut ordered): (Vec<_>, Vec<_>) = packages
        .into_iter()
        .partition(|p| defer.iter().any(|d| d.same_distribution(p)));
    for d in defer {
        if let Some(p) = deferred.iter().find(|p| p.same_distribution(d)) {
            if !ordered.iter().any(|o| o.same_distribution(p)) {
                ordered.push(p.clone());
            }
        }
    }
    ordered
}

/// Split a command line the way a POSIX shell would, honoring quotes.
fn split_command_line(line: &str) -> Result<Vec<String>> {
    let Some(argv) = shlex::split(line) else {
        anyhow::bail!("--verify-command has unbalanced quotes: {}", line);
    };
    if argv.is_empty() {
        anyhow::bail!("--verify-command cannot be empty.");
    }
    Ok(argv)
}
