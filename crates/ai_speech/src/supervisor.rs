//! Process supervisor
//!
//! Owns every externally-spawned process: the long-running local recognition
//! server (at most one instance at a time) and the short-lived synthesis
//! subprocesses. No other component holds a child handle.
//!
//! The one-shot pipe protocol orders its steps so the parent can never
//! deadlock against a child that fills its stderr pipe: the stderr drain is
//! running before the first stdin byte is written, and the two stay
//! concurrent until the child exits.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::LocalSttConfig;
use crate::error::SpeechError;

/// Lifecycle state of the long-running recognition server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Never started in this supervisor's lifetime
    NotStarted,
    /// Spawn in progress
    Starting,
    /// Tracked child process is believed alive
    Running,
    /// Stopped by [`ProcessSupervisor::stop`]
    Stopped,
}

/// Result of a one-shot subprocess run
///
/// Exit status and output-file existence are the success signals; the
/// drained stderr is diagnostic context only. Non-empty stderr by itself is
/// not a failure.
#[derive(Debug)]
pub struct OneShotOutput {
    /// How the child exited
    pub status: std::process::ExitStatus,
    /// Everything the child wrote to stderr
    pub stderr: String,
}

#[derive(Debug)]
struct ServerState {
    status: ServerStatus,
    child: Option<Child>,
}

/// Owns the lifecycle of local inference processes
#[derive(Debug)]
pub struct ProcessSupervisor {
    server: Mutex<ServerState>,
}

impl ProcessSupervisor {
    /// Supervisor with no tracked process
    #[must_use]
    pub fn new() -> Self {
        Self {
            server: Mutex::new(ServerState {
                status: ServerStatus::NotStarted,
                child: None,
            }),
        }
    }

    /// Current lifecycle state of the recognition server
    pub async fn status(&self) -> ServerStatus {
        self.server.lock().await.status
    }

    /// Start the recognition server unless a tracked instance is already
    /// running.
    ///
    /// The server is spawned with its stdout and stderr piped into drain
    /// tasks, so the parent is never blocked by the child filling its
    /// console pipe buffers. On Unix the child gets its own process group so
    /// [`stop`](Self::stop) can terminate the whole tree.
    #[instrument(skip(self, config), fields(executable = %config.executable_path.display()))]
    pub async fn ensure_started(&self, config: &LocalSttConfig) -> Result<(), SpeechError> {
        let mut state = self.server.lock().await;

        if state.status == ServerStatus::Running {
            if let Some(child) = state.child.as_mut() {
                match child.try_wait() {
                    Ok(None) => {
                        debug!("Recognition server already running, skipping start");
                        return Ok(());
                    },
                    Ok(Some(exit)) => {
                        warn!(status = %exit, "Tracked recognition server exited, restarting");
                    },
                    Err(e) => {
                        warn!(error = %e, "Could not poll recognition server, restarting");
                    },
                }
            }
            state.child = None;
        }

        state.status = ServerStatus::Starting;

        let mut command = Command::new(&config.executable_path);
        command
            .arg("--model")
            .arg(&config.model_path)
            .arg("--host")
            .arg(&config.host)
            .arg("--port")
            .arg(config.port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Recognition server not found at '{}'",
                    config.executable_path.display()
                ))
            } else {
                SpeechError::ProcessFailed {
                    status: "spawn failed".to_string(),
                    stderr: e.to_string(),
                }
            }
        })?;

        if let Some(stdout) = child.stdout.take() {
            spawn_line_drain(stdout, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_drain(stderr, "stderr");
        }

        info!(pid = ?child.id(), "Recognition server started");
        state.child = Some(child);
        state.status = ServerStatus::Running;
        Ok(())
    }

    /// Stop the recognition server and its whole process tree.
    ///
    /// Idempotent; never errors, even when the process already exited. Must
    /// be called on every configuration reload and on shutdown, an orphaned
    /// server is a correctness bug.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let mut state = self.server.lock().await;

        if let Some(mut child) = state.child.take() {
            #[cfg(unix)]
            if let Some(pid) = child.id() {
                use nix::sys::signal::{Signal, killpg};
                use nix::unistd::Pid;

                // Signal the whole group; the child may have spawned workers.
                #[allow(clippy::cast_possible_wrap)]
                let group = Pid::from_raw(pid as i32);
                if let Err(e) = killpg(group, Signal::SIGKILL) {
                    debug!(error = %e, "Process group signal failed, process likely gone");
                }
            }

            if let Err(e) = child.kill().await {
                debug!(error = %e, "Kill failed, process likely already exited");
            }
            match child.wait().await {
                Ok(exit) => info!(status = %exit, "Recognition server stopped"),
                Err(e) => debug!(error = %e, "Could not reap recognition server"),
            }
        }

        state.status = ServerStatus::Stopped;
    }

    /// Run a one-shot subprocess, feeding `input` on stdin and draining
    /// stderr concurrently.
    ///
    /// The ordering is mandatory: the stderr drain task starts before any
    /// stdin write. Writing first and waiting for exit with stderr unread
    /// deadlocks once the child fills its stderr pipe buffer, because the
    /// child blocks writing diagnostics while the parent blocks waiting.
    #[instrument(skip(self, args, input), fields(program = %program.display(), input_len = input.len()))]
    pub async fn run_one_shot<I, S>(
        &self,
        program: &Path,
        args: I,
        input: &str,
    ) -> Result<OneShotOutput, SpeechError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!("Executable not found at '{}'", program.display()))
            } else {
                SpeechError::ProcessFailed {
                    status: "spawn failed".to_string(),
                    stderr: e.to_string(),
                }
            }
        })?;

        // Drain stderr into memory before the first stdin byte is written.
        let stderr = child.stderr.take();
        let drain = tokio::spawn(async move {
            let mut buffer = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buffer).await;
            }
            buffer
        });

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).await.map_err(|e| {
                SpeechError::ProcessFailed {
                    status: "stdin write failed".to_string(),
                    stderr: e.to_string(),
                }
            })?;
            stdin.shutdown().await.map_err(|e| SpeechError::ProcessFailed {
                status: "stdin close failed".to_string(),
                stderr: e.to_string(),
            })?;
            // Dropping the handle closes the pipe, signalling end-of-input.
            drop(stdin);
        }

        let status = child.wait().await.map_err(|e| SpeechError::ProcessFailed {
            status: "wait failed".to_string(),
            stderr: e.to_string(),
        })?;

        // Only after exit: the drain task has seen EOF and can complete.
        let stderr_bytes = drain.await.unwrap_or_default();
        let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

        debug!(status = %status, stderr_len = stderr.len(), "One-shot subprocess finished");
        Ok(OneShotOutput { status, stderr })
    }
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward a child's console pipe to tracing, line by line
fn spawn_line_drain<R>(pipe: R, stream: &'static str)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(stream, "recognition-server: {line}");
        }
    });
}
