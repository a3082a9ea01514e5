//! Subprocess execution.
//!
//! One primitive serves the whole step: run a fixed argv in a working
//! directory and report whether it exited cleanly. Probing commands run
//! with output discarded; the final test command streams its stdout to
//! the log sink line by line while the caller blocks on exit, so the
//! child can never stall on a full pipe nobody is reading. stderr is
//! kept aside and relayed only when the command fails.

use crate::output::LogSink;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Issues a single command and reports whether it exited cleanly.
///
/// The production implementation spawns real processes; tests substitute
/// a scripted runner to observe the exact command sequence.
pub trait CommandRunner {
    /// Run `argv` with `workdir` as its current directory.
    ///
    /// With `suppress` set, the command's output is discarded. Otherwise
    /// stdout is relayed line by line to `log` while the process runs,
    /// and stderr is relayed after the fact iff the command failed.
    ///
    /// Returns `true` iff the process started and exited with status 0.
    fn run(&self, argv: &[String], workdir: &Path, log: &dyn LogSink, suppress: bool) -> bool;
}

fn runtime() -> &'static tokio::runtime::Runtime {
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .enable_io()
            .build()
            .expect("failed to build tokio runtime for subprocess execution")
    })
}

/// Real subprocess runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    /// Bound on each command's wait. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String], workdir: &Path, log: &dyn LogSink, suppress: bool) -> bool {
        let spinner = suppress.then(|| command_spinner(argv));
        let ok = runtime().block_on(run_streamed(argv, workdir, log, suppress, self.timeout));
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        ok
    }
}

/// Spinner shown while a suppressed-output command runs.
fn command_spinner(argv: &[String]) -> ProgressBar {
    let cmd = argv.join(" ");
    let display_cmd = if cmd.len() > 60 {
        format!("{}...", &cmd[..57])
    } else {
        cmd
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("     {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(format!("run: {display_cmd}"));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Relay `source` line by line into the sink as it arrives.
async fn relay_lines<R: AsyncRead + Unpin>(source: R, sink: &dyn LogSink) {
    let mut lines = BufReader::new(source).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        sink.output(&line);
    }
}

/// Read `source` to completion, keeping the lines for later.
async fn buffer_lines<R: AsyncRead + Unpin>(source: R) -> Vec<String> {
    let mut buffered = Vec::new();
    let mut lines = BufReader::new(source).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        buffered.push(line);
    }
    buffered
}

async fn run_streamed(
    argv: &[String],
    workdir: &Path,
    log: &dyn LogSink,
    suppress: bool,
    timeout: Option<Duration>,
) -> bool {
    let Some((program, args)) = argv.split_first() else {
        return false;
    };

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .current_dir(workdir)
        // The tool never reads interactive input; close stdin up front.
        .stdin(Stdio::null())
        // A dropped wait must not leave the child running.
        .kill_on_drop(true);
    if suppress {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    } else {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            if !suppress {
                log.error(&format!("failed to start {program}: {e}"));
            }
            return false;
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let drain_stdout = async {
        if let Some(out) = stdout {
            relay_lines(out, log).await;
        }
    };
    let drain_stderr = async {
        match stderr {
            Some(err) => buffer_lines(err).await,
            None => Vec::new(),
        }
    };
    // Killing the child on timeout closes its pipes, so both drains
    // reach EOF and the join completes.
    let wait = async {
        match timeout {
            Some(bound) => match tokio::time::timeout(bound, child.wait()).await {
                Ok(res) => res.map_err(|e| format!("failed waiting for {program}: {e}")),
                Err(_) => {
                    let _ = child.kill().await;
                    let _ = child.wait().await;
                    Err(format!("{program} timed out after {}s", bound.as_secs()))
                }
            },
            None => child
                .wait()
                .await
                .map_err(|e| format!("failed waiting for {program}: {e}")),
        }
    };

    // stdout is fully relayed before any verdict is delivered.
    let (waited, (), stderr_lines) = tokio::join!(wait, drain_stdout, drain_stderr);

    match waited {
        Ok(status) if status.success() => true,
        Ok(status) => {
            if !suppress {
                log.error(&format!("{program} exited with {status}"));
                for line in stderr_lines {
                    log.output(&line);
                }
            }
            false
        }
        Err(message) => {
            if !suppress {
                log.error(&message);
                for line in stderr_lines {
                    log.output(&line);
                }
            }
            false
        }
    }
}
