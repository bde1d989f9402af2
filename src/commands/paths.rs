use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Name of the per-project configuration file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "envboot.json";

/// Default environment directory, relative to the working directory.
pub const DEFAULT_VENV_DIR: &str = ".venv";

/// Interpreter used to create the environment when none is configured.
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";

#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

/// Locate the configuration file to use, if any.
///
/// An explicit path always wins and must exist. Otherwise `envboot.json` in
/// the working directory, then `<config dir>/envboot/config.json`.
#[tracing::instrument(skip(runtime))]
pub fn find_config_file<R: Runtime>(runtime: &R, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = absolutize(runtime, path)?;
        if !runtime.is_file(&path) {
            anyhow::bail!("Config file {} does not exist.", path.display());
        }
        return Ok(Some(path));
    }

    let project = runtime.current_dir()?.join(PROJECT_CONFIG_FILE);
    if runtime.is_file(&project) {
        return Ok(Some(project));
    }

    if let Some(config_dir) = runtime.config_dir() {
        let user = user_config_file(&config_dir);
        if runtime.is_file(&user) {
            return Ok(Some(user));
        }
        debug!("No user config at {:?}", user);
    }

    Ok(None)
}

pub fn user_config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("envboot").join("config.json")
}

/// Resolve a relative path against the working directory.
pub fn absolutize<R: Runtime>(runtime: &R, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(runtime.current_dir()?.join(path))
    }
}

/// Resolve a relative path against `base` (typically a config file's directory).
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
