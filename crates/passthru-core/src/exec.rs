//! Execution strategy for pass-through runs
//!
//! A run either inherits the terminal (the backend talks to the user
//! directly) or is captured, in which case stdout is relayed on success and
//! stderr on failure.

use std::{
    fmt,
    io::{IsTerminal, Write},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{backend::Backend, Error, Result};

/// Whether pass-through runs may attach to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractivePolicy {
    /// Interactive when stdin and stdout are both terminals
    #[default]
    Auto,
    Always,
    Never,
}

impl<'de> Deserialize<'de> for InteractivePolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for InteractivePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid interactive policy: {s}. Must be one of: auto, always, never"
            ))),
        }
    }
}

impl fmt::Display for InteractivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Interactive,
    Captured { timeout: Option<Duration> },
}

impl ExecutionMode {
    /// Pick the mode for one run.
    ///
    /// `--capture` always wins; otherwise the policy decides, with `Auto`
    /// deferring to whether a terminal is attached.
    #[must_use]
    pub const fn select(
        policy: InteractivePolicy,
        capture_requested: bool,
        terminal: bool,
        timeout: Option<Duration>,
    ) -> Self {
        let interactive = !capture_requested
            && match policy {
                InteractivePolicy::Always => true,
                InteractivePolicy::Never => false,
                InteractivePolicy::Auto => terminal,
            };

        if interactive {
            Self::Interactive
        } else {
            Self::Captured { timeout }
        }
    }
}

/// How a backend run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    #[must_use]
    pub const fn from_success(succeeded: bool) -> Self {
        if succeeded {
            Self::Success
        } else {
            Self::Failure
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Whether both stdin and stdout are attached to a terminal.
#[must_use]
pub fn stdio_is_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Run `<backend> <command> <tokens...>` in `mode`.
///
/// A captured run writes the backend's stdout to `out` on success. On
/// failure its stderr goes to `err`, or its stdout when stderr is empty.
///
/// # Errors
///
/// Propagates spawn and timeout errors from the backend; IO errors writing
/// the relayed output.
pub fn run_pass_through(
    backend: &dyn Backend,
    command: &str,
    tokens: &[String],
    mode: ExecutionMode,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    tracing::info!(program = backend.program(), command, ?tokens, ?mode, "passing through");

    match mode {
        ExecutionMode::Interactive => {
            let succeeded = backend.run_interactive(command, tokens)?;
            Ok(Outcome::from_success(succeeded))
        }
        ExecutionMode::Captured { timeout } => {
            let output = backend.run_captured(command, tokens, timeout)?;
            if output.succeeded {
                out.write_all(output.stdout.as_bytes())?;
                out.flush()?;
            } else {
                let text = if output.stderr.is_empty() {
                    &output.stdout
                } else {
                    &output.stderr
                };
                err.write_all(text.as_bytes())?;
                err.flush()?;
            }
            Ok(Outcome::from_success(output.succeeded))
        }
    }
}
