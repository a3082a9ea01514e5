//! The build step itself.
//!
//! Resolves how the tool is installed, materializes the bundled default
//! configuration into the working directory, assembles the final test
//! command and maps its exit status to a pass/fail outcome.

use crate::config::StepConfig;
use crate::context::StepContext;
use crate::error::StepError;
use crate::install::{Installation, resolve_installation};
use crate::process::CommandRunner;
use std::path::{Path, PathBuf};

/// Bundled default configuration, copied into the workdir on every run.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../resources/defaultReport.yml");

/// Final pass/fail verdict of one step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failure,
}

impl BuildOutcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// One configured "run performance test" step.
#[derive(Debug, Clone)]
pub struct PerformanceTestStep {
    params: String,
    config: StepConfig,
}

impl PerformanceTestStep {
    /// Step with the stock configuration.
    ///
    /// `params` is a raw whitespace-separated argument string passed
    /// through to the tool.
    pub fn new(params: impl Into<String>) -> Self {
        Self::with_config(params, StepConfig::default())
    }

    pub fn with_config(params: impl Into<String>, config: StepConfig) -> Self {
        Self {
            params: params.into(),
            config,
        }
    }

    /// Raw parameter string as supplied by the caller.
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Run the full probe/provision/execute chain.
    ///
    /// Always resolves to exactly one of two outcomes; no failure in
    /// the chain escapes as a panic or an error.
    pub fn perform(&self, runner: &dyn CommandRunner, ctx: &StepContext) -> BuildOutcome {
        let installation = resolve_installation(runner, ctx, &self.config);
        if !installation.is_usable() {
            ctx.log
                .error("performance-test tool is unavailable, marking the build as failed");
            return BuildOutcome::Failure;
        }

        let config_path = match self.materialize_default_config(ctx) {
            Ok(path) => path,
            Err(e) => {
                ctx.log.error(&e.to_string());
                return BuildOutcome::Failure;
            }
        };

        ctx.log.progress("Starting the performance test");
        let argv = self.test_command(installation, &config_path);
        if runner.run(&argv, &ctx.workdir, ctx.log.as_ref(), false) {
            BuildOutcome::Success
        } else {
            BuildOutcome::Failure
        }
    }

    /// Final argv: resolved tool, whitespace-split params with empty
    /// tokens dropped, then the materialized configuration path.
    fn test_command(&self, installation: Installation, config_path: &Path) -> Vec<String> {
        let tool = match installation {
            Installation::Local => self.config.local_command(),
            _ => self.config.command.clone(),
        };

        let tokens = tokenize(&self.params);
        let mut argv = Vec::with_capacity(tokens.len() + 2);
        argv.push(tool);
        argv.extend(tokens);
        argv.push(config_path.display().to_string());
        argv
    }

    /// Copy the bundled template to `workdir/<config_filename>`,
    /// overwriting whatever is already there.
    fn materialize_default_config(&self, ctx: &StepContext) -> Result<PathBuf, StepError> {
        let path = ctx.workdir.join(&self.config.config_filename);
        std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE).map_err(|source| {
            StepError::TemplateWrite {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }
}

/// Split a raw parameter string into argv tokens.
///
/// Tokens are split on whitespace; empty tokens from repeated
/// whitespace are dropped and the order of the rest is preserved.
/// Arguments containing embedded spaces cannot be expressed.
pub fn tokenize(params: &str) -> Vec<String> {
    params.split_whitespace().map(str::to_owned).collect()
}
