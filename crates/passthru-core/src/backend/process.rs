//! Backend invocation through real child processes

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tokio::{process::Command, runtime::Runtime};

use super::{Backend, CapturedOutput};
use crate::{Error, Result};

/// Runs the backend as a child process.
///
/// Owns a current-thread tokio runtime so callers stay synchronous; calls
/// must not be made from inside another tokio runtime.
#[derive(Debug)]
pub struct ProcessBackend {
    /// Name shown in the backend's own help output
    program: String,
    /// Resolved executable path
    executable: PathBuf,
    runtime: Runtime,
}

impl ProcessBackend {
    /// Locate `program` (a bare name searched on PATH, or a path) and prepare
    /// to run it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendNotFound`] if the executable cannot be found,
    /// or [`Error::Io`] if the runtime cannot be created.
    pub fn new(program: &str) -> Result<Self> {
        let executable = which::which(program).map_err(|_| Error::BackendNotFound {
            program: program.to_string(),
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Io(format!("Failed to create process runtime: {e}")))?;

        Ok(Self {
            program: display_name(program),
            executable,
            runtime,
        })
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self, command: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(command).args(args);
        cmd
    }

    fn spawn_error(&self, error: &std::io::Error) -> Error {
        if error.kind() == ErrorKind::NotFound {
            Error::BackendNotFound {
                program: self.program.clone(),
            }
        } else {
            Error::Spawn {
                program: self.program.clone(),
                reason: error.to_string(),
            }
        }
    }
}

impl Backend for ProcessBackend {
    fn program(&self) -> &str {
        &self.program
    }

    fn run_captured(
        &self,
        command: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<CapturedOutput> {
        tracing::debug!(program = %self.program, command, ?args, ?timeout, "running backend (captured)");

        let mut cmd = self.command(command, args);
        cmd.stdin(Stdio::null()).kill_on_drop(true);

        let output = self.runtime.block_on(async {
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(Error::Timeout {
                            command: format!("{} {command}", self.program),
                            limit,
                        })
                    }
                },
                None => cmd.output().await,
            };
            result.map_err(|e| self.spawn_error(&e))
        })?;

        let captured = CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            succeeded: output.status.success(),
        };
        tracing::debug!(command, status = ?output.status.code(), "backend finished");
        Ok(captured)
    }

    fn run_interactive(&self, command: &str, args: &[String]) -> Result<bool> {
        tracing::debug!(program = %self.program, command, ?args, "running backend (interactive)");

        let mut cmd = self.command(command, args);
        // The child must be spawned inside the runtime so its reaper can register.
        let status = self
            .runtime
            .block_on(async { cmd.status().await })
            .map_err(|e| self.spawn_error(&e))?;

        tracing::debug!(command, status = ?status.code(), "backend finished");
        Ok(status.success())
    }
}

/// `/usr/local/bin/ddev` is shown as `ddev`.
fn display_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| program.to_string(), ToString::to_string)
}
