use anyhow::Result;
use clap::Parser;
use envboot::commands::{Overrides, bootstrap};
use std::path::PathBuf;
use std::process::ExitCode;

/// envboot - bootstrap a Python virtual environment
///
/// Creates the environment if needed, installs every configured package
/// (retrying once without binary preference), then runs a verification pass.
///
/// Exit codes: 0 when everything installed and verification passed,
/// 1 when a package failed or verification failed, 3 when the environment
/// could not be created.
#[derive(Parser, Debug)]
#[command(author, version = env!("ENVBOOT_VERSION"), about)]
struct Cli {
    /// Config file (defaults to ./envboot.json, then the user config dir)
    #[arg(long, short = 'c', env = "ENVBOOT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read the package list from a pip requirements file
    #[arg(long, short = 'r', env = "ENVBOOT_REQUIREMENTS", value_name = "PATH")]
    requirements: Option<PathBuf>,

    /// Environment directory (defaults to ./.venv)
    #[arg(long, env = "ENVBOOT_VENV", value_name = "PATH")]
    venv: Option<PathBuf>,

    /// Python interpreter used to create the environment
    #[arg(long, env = "ENVBOOT_PYTHON", value_name = "PATH")]
    python: Option<PathBuf>,

    /// Command run once at the end to verify the environment
    /// (defaults to checking that every package can be imported)
    #[arg(long, env = "ENVBOOT_VERIFY_COMMAND", value_name = "COMMAND")]
    verify_command: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            config: cli.config,
            python: cli.python,
            venv: cli.venv,
            requirements: cli.requirements,
            verify_command: cli.verify_command,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = envboot::runtime::RealRuntime;

    let code = bootstrap(runtime, cli.into()).await?;
    Ok(ExitCode::from(code))
}
