//! Bootstrap-and-run pipeline step for Taurus (bzt) performance tests.
//!
//! Given a working directory and a log sink supplied by the calling
//! pipeline, the step probes for a machine-wide `bzt` installation,
//! falls back to provisioning one inside a local virtualenv, runs the
//! test command against a generated default configuration, and maps
//! the subprocess exit status to a single pass/fail outcome.
//!
//! The fallback chain, in order, short-circuiting on the first failed
//! prerequisite:
//!
//! 1. `bzt --help` (use the machine-wide installation if it answers)
//! 2. `virtualenv --help` (check the isolation helper is present)
//! 3. `virtualenv --clear --system-site-packages taurus-venv`
//! 4. `taurus-venv/bin/pip --no-cache-dir install bzt`
//! 5. `taurus-venv/bin/bzt --help` (verify the fresh install)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taurus_step::{ConsoleLog, PerformanceTestStep, ProcessRunner, StepContext};
//!
//! let step = PerformanceTestStep::new("-o modules.console.disable=true");
//! let ctx = StepContext::new("build/workspace", Arc::new(ConsoleLog));
//! let outcome = step.perform(&ProcessRunner::default(), &ctx);
//! assert!(outcome.is_success());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod install;
pub mod output;
pub mod process;
pub mod step;

pub use config::StepConfig;
pub use context::StepContext;
pub use error::StepError;
pub use install::Installation;
pub use output::{ConsoleLog, LogSink, MemoryLog};
pub use process::{CommandRunner, ProcessRunner};
pub use step::{BuildOutcome, PerformanceTestStep};
