//! Error types for passthru with categorization:
//!
//! - **Integration errors**: a backend flag collides with a reserved wrapper option
//! - **Discovery errors**: the backend did not describe its commands
//! - **User errors**: unknown command, invalid configuration (exit code 1)
//! - **System errors**: spawning, timeouts, IO (exit code 2, or 3 when the backend is missing)
//!
//! A backend that runs and exits non-zero is not an error here; see
//! [`crate::exec::Outcome`].

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for every fallible passthru operation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A backend-defined flag uses a long or short name that is already
    /// taken, by the wrapper or by another flag of the same command.
    #[error(
        "Conflict between an already defined option and the '--{flag}' option for command {command}"
    )]
    FlagConflict { flag: String, command: String },

    /// The backend's command listing could not be found or parsed.
    #[error("{0}")]
    Discovery(String),

    /// The user asked for a command the backend does not provide.
    #[error("Command \"{0}\" does not exist.")]
    CommandNotFound(String),

    /// The backend executable could not be located.
    #[error(
        "Backend '{program}' is not installed or not in PATH.\n\n\
         Set `backend` in the passthru config or PASSTHRU_BACKEND to its location."
    )]
    BackendNotFound { program: String },

    /// The backend process could not be started or waited on.
    #[error("Failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// A captured backend run exceeded its timeout and was terminated.
    #[error("'{command}' did not finish within {limit:?} and was terminated")]
    Timeout { command: String, limit: Duration },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Build the fatal discovery error pointing at the manual help invocation.
    pub fn discovery(program: &str, what: &str) -> Self {
        Self::Discovery(format!(
            "No {what} found - run \"{program} help\" and confirm it outputs correctly."
        ))
    }

    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit code scheme:
    /// - 1: User error (unknown command, bad configuration)
    /// - 2: System or integration error
    /// - 3: Backend not installed
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound(_) | Self::InvalidConfig(_) | Self::Parse(_) => 1,
            Self::BackendNotFound { .. } => 3,
            Self::FlagConflict { .. }
            | Self::Discovery(_)
            | Self::Spawn { .. }
            | Self::Timeout { .. }
            | Self::Io(_) => 2,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(format!("Failed to parse config: {err}"))
    }
}

/// Result type alias for passthru-core operations
pub type Result<T> = std::result::Result<T, Error>;
