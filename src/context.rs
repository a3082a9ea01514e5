//! Per-invocation execution context.

use crate::output::LogSink;
use std::path::PathBuf;
use std::sync::Arc;

/// Working directory and log sink supplied by the calling pipeline for
/// one invocation of the step.
///
/// Owned by the caller; nothing in it survives across invocations. All
/// probing, provisioning and test execution happens with `workdir` as
/// the subprocess current directory, and every line of output goes to
/// `log`.
#[derive(Clone)]
pub struct StepContext {
    pub workdir: PathBuf,
    pub log: Arc<dyn LogSink>,
}

impl StepContext {
    pub fn new(workdir: impl Into<PathBuf>, log: Arc<dyn LogSink>) -> Self {
        Self {
            workdir: workdir.into(),
            log,
        }
    }
}
