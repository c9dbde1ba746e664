//! PowerShell invocation.
//!
//! Every host operation shells into `powershell.exe -NoProfile
//! -NonInteractive -Command <script>`. Stdout and stderr are drained on
//! background threads so a chatty script cannot deadlock on a full pipe
//! buffer, and the wait is bounded: the child is polled until the
//! configured timeout and killed on expiry.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::HostError;

/// Default bound on a single PowerShell command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Handle for running PowerShell scripts.
#[derive(Debug, Clone)]
pub struct PowerShell {
    program: String,
    timeout: Duration,
}

impl Default for PowerShell {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

/// Captured output of one finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout and stderr concatenated, for error reporting.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

impl PowerShell {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("powershell.exe", timeout)
    }

    /// Overrides the shell executable. Used by tests and non-Windows
    /// development hosts where `powershell.exe` is not on PATH.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one script and captures its output regardless of exit status.
    pub fn run(&self, script: &str) -> Result<CommandOutput, HostError> {
        debug!(program = %self.program, script, "Running host command");

        let mut child = Command::new(&self.program)
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HostError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Drain both pipes concurrently; the child may fill one buffer
        // before it exits.
        let stdout_thread = child.stdout.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });
        let stderr_thread = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });

        let status = match wait_with_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HostError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HostError::Wait {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        let stdout_buf = stdout_thread
            .and_then(|thread| thread.join().ok())
            .unwrap_or_default();
        let stderr_buf = stderr_thread
            .and_then(|thread| thread.join().ok())
            .unwrap_or_default();

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            exit_code: status.code(),
        })
    }

    /// Runs one script and fails on a non-zero exit, carrying the combined
    /// output in the error.
    pub fn run_checked(&self, script: &str) -> Result<CommandOutput, HostError> {
        let output = self.run(script)?;
        if !output.success() {
            return Err(HostError::CommandFailed {
                code: output.exit_code,
                output: output.combined(),
            });
        }
        Ok(output)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
