//! Backend invocation
//!
//! The backend is the external executable whose commands passthru exposes.
//! Every call has the shape `<backend> <command> [args...]`, run either with
//! the terminal inherited or with stdout/stderr captured.

mod process;

use std::time::Duration;

use serde_json::Value;

use crate::Result;

pub use process::ProcessBackend;

/// Flag appended to a backend call to request a structured (JSON) document.
pub const STRUCTURED_OUTPUT_FLAG: &str = "--json-output";

/// Result of a captured backend run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub succeeded: bool,
}

impl CapturedOutput {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            succeeded: true,
        }
    }

    #[must_use]
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            succeeded: false,
        }
    }

    /// Stdout when the run succeeded, stderr otherwise.
    #[must_use]
    pub fn text(&self) -> &str {
        if self.succeeded {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs the backend executable.
///
/// Implementations must be shareable across threads: completion callbacks
/// hold a handle to the backend for the life of the process.
pub trait Backend: Send + Sync {
    /// Display name of the backend executable, as it appears in its own help
    /// output (e.g. `ddev`).
    fn program(&self) -> &str;

    /// Run `<backend> <command> [args...]` capturing stdout and stderr.
    ///
    /// A `timeout` terminates the process and yields [`crate::Error::Timeout`].
    fn run_captured(
        &self,
        command: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<CapturedOutput>;

    /// Run `<backend> <command> [args...]` attached to the current terminal.
    ///
    /// Returns whether the backend exited successfully.
    fn run_interactive(&self, command: &str, args: &[String]) -> Result<bool>;

    /// Run a captured call with [`STRUCTURED_OUTPUT_FLAG`] appended and return
    /// the document's `raw` payload, or `None` when no document was emitted.
    fn run_structured(
        &self,
        command: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<Option<Value>> {
        let mut args = args.to_vec();
        args.push(STRUCTURED_OUTPUT_FLAG.to_string());
        let output = self.run_captured(command, &args, timeout)?;
        Ok(parse_structured(output.text()))
    }
}

/// Extract the `raw` payload from structured backend output.
///
/// The whole text is tried first; failing that, the last line holding a JSON
/// object wins, since some backends log plain lines before the document.
pub fn parse_structured(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .or_else(|| {
            trimmed
                .lines()
                .rev()
                .map(str::trim)
                .filter(|line| line.starts_with('{'))
                .find_map(|line| serde_json::from_str::<Value>(line).ok())
        })
        .and_then(|doc| doc.get("raw").filter(|raw| !raw.is_null()).cloned())
}
