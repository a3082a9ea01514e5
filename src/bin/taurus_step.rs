//! taurus-step CLI - run a Taurus performance test as a pipeline step.
//!
//! Usage:
//!   taurus-step -w build/workspace -- -o modules.console.disable=true
//!
//! Everything after `--` is passed to the tool unchanged, followed by
//! the path of the generated default configuration. The process exits
//! 0 when the test command succeeded and 1 otherwise.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use taurus_step::{
    BuildOutcome, ConsoleLog, PerformanceTestStep, ProcessRunner, StepConfig, StepContext,
};

#[derive(Parser)]
#[command(name = "taurus-step")]
#[command(about = "Run a Taurus (bzt) performance test as a pass/fail pipeline step")]
#[command(version)]
struct Cli {
    /// Arguments passed through to the test tool.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    params: Vec<String>,

    /// Working directory for probing, provisioning and the test run.
    #[arg(short, long, default_value = ".", env = "TAURUS_STEP_WORKDIR")]
    workdir: PathBuf,

    /// TOML file overriding the tool command, venv directory, report
    /// filename and timeout.
    #[arg(short, long, env = "TAURUS_STEP_CONFIG")]
    config: Option<PathBuf>,

    /// Bound, in seconds, on each spawned command. Unbounded if unset.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StepConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StepConfig::default(),
    };
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Some(std::time::Duration::from_secs(secs));
    }

    std::fs::create_dir_all(&cli.workdir).with_context(|| {
        format!(
            "Failed to create working directory {}",
            cli.workdir.display()
        )
    })?;
    let workdir = cli.workdir.canonicalize().with_context(|| {
        format!(
            "Failed to resolve working directory {}",
            cli.workdir.display()
        )
    })?;

    let runner = ProcessRunner::new(config.timeout);
    let step = PerformanceTestStep::with_config(cli.params.join(" "), config);
    let ctx = StepContext::new(workdir, Arc::new(ConsoleLog));

    Ok(match step.perform(&runner, &ctx) {
        BuildOutcome::Success => ExitCode::SUCCESS,
        BuildOutcome::Failure => ExitCode::FAILURE,
    })
}
