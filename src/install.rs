//! Tool availability probing and isolated-environment provisioning.
//!
//! A short fallback chain decides how the performance-test command will
//! be invoked: use the machine-wide installation when one answers the
//! probe, otherwise provision a virtualenv under the working directory
//! and install the tool there. The chain short-circuits on the first
//! failed prerequisite.

use crate::config::StepConfig;
use crate::context::StepContext;
use crate::process::CommandRunner;

/// How the performance-test tool can be reached on this host.
///
/// Computed once per invocation and consumed by the executor to pick
/// the command prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    /// A machine-wide installation answered the probe.
    Global,
    /// The tool was installed into a virtualenv under the workdir.
    Local,
    /// Neither available nor provisionable.
    Unavailable,
}

impl Installation {
    /// Whether the executor has a usable tool at all.
    pub fn is_usable(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Probe for the tool and provision it locally when absent.
///
/// Every step writes a progress line to the sink before the next step
/// runs. All probe and provisioning commands run with output discarded.
/// A virtualenv left behind by a failed install is not removed.
pub fn resolve_installation(
    runner: &dyn CommandRunner,
    ctx: &StepContext,
    cfg: &StepConfig,
) -> Installation {
    let log = ctx.log.as_ref();

    log.progress(&format!(
        "Checking for a {} installation on this machine",
        cfg.command
    ));
    if runner.run(&cfg.probe_global(), &ctx.workdir, log, true) {
        log.progress(&format!("{} is installed on this machine", cfg.command));
        return Installation::Global;
    }

    log.progress(&format!(
        "No {} on this machine, checking for virtualenv",
        cfg.command
    ));
    if !runner.run(&cfg.probe_virtualenv(), &ctx.workdir, log, true) {
        log.progress("virtualenv is not available, cannot provision locally");
        return Installation::Unavailable;
    }

    log.progress("virtualenv is available, creating an isolated environment");
    if !runner.run(&cfg.create_venv(), &ctx.workdir, log, true) {
        log.progress("Failed to create the isolated environment");
        return Installation::Unavailable;
    }

    log.progress(&format!("Environment created, installing {}", cfg.command));
    if !runner.run(&cfg.install_tool(), &ctx.workdir, log, true) {
        log.progress(&format!("Failed to install {}", cfg.command));
        return Installation::Unavailable;
    }

    log.progress(&format!(
        "{} installed, checking the fresh copy",
        cfg.command
    ));
    if runner.run(&cfg.probe_local(), &ctx.workdir, log, true) {
        log.progress(&format!("Local {} is working", cfg.command));
        Installation::Local
    } else {
        log.progress(&format!("Local {} does not respond", cfg.command));
        Installation::Unavailable
    }
}
