//! Shared helpers: a scripted command runner and a scratch execution
//! context with a capturing log sink.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use taurus_step::{CommandRunner, LogSink, MemoryLog, StepContext};
use tempfile::TempDir;

/// Answers each `run` call from a fixed list of verdicts and records
/// every argv it was asked to issue.
///
/// Running off the end of the verdict list panics, which turns an
/// unexpected extra command into a test failure.
pub struct ScriptedRunner {
    verdicts: Mutex<Vec<bool>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(verdicts: &[bool]) -> Self {
        Self {
            verdicts: Mutex::new(verdicts.to_vec()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every argv issued so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[String], _workdir: &Path, _log: &dyn LogSink, _suppress: bool) -> bool {
        self.calls.lock().unwrap().push(argv.to_vec());
        self.verdicts.lock().unwrap().remove(0)
    }
}

/// Scratch working directory plus a capturing log sink.
pub struct TestEnv {
    dir: TempDir,
    pub log: Arc<MemoryLog>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            log: Arc::new(MemoryLog::new()),
        }
    }

    pub fn context(&self) -> StepContext {
        StepContext::new(self.dir.path(), self.log.clone())
    }

    pub fn workdir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}
