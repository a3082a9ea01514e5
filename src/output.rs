//! Log sink abstraction and colored console output.
//!
//! The calling pipeline supplies the sink; progress lines, relayed
//! subprocess output and failure detail all go through it. Uses
//! owo-colors for terminal colors.

use owo_colors::OwoColorize;
use std::sync::Mutex;

/// Destination for the step's human-readable output.
///
/// Supplied by the caller for the lifetime of one invocation.
pub trait LogSink: Send + Sync {
    /// One step-progress line.
    fn progress(&self, message: &str);

    /// One line of relayed subprocess output.
    fn output(&self, line: &str);

    /// One diagnostic line for a failed command.
    fn error(&self, message: &str);
}

/// Colored stdout sink for interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn progress(&self, message: &str) {
        println!("{} {}", "==>".blue().bold(), message.bold());
    }

    fn output(&self, line: &str) {
        println!("     {line}");
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }
}

/// In-memory sink capturing every line in arrival order.
///
/// Useful for embedders that record build logs themselves, and for
/// asserting on output in tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

impl LogSink for MemoryLog {
    fn progress(&self, message: &str) {
        self.push(message.to_owned());
    }

    fn output(&self, line: &str) {
        self.push(line.to_owned());
    }

    fn error(&self, message: &str) {
        self.push(format!("error: {message}"));
    }
}
