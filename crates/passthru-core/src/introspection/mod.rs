//! Backend self-description
//!
//! The backend describes itself in one of two shapes: a structured JSON
//! document (`<backend> help [command] --json-output`) or free help text
//! (`<backend> help`, `<backend> <command> -h`). Both are implementations of
//! [`IntrospectionSource`]; structured is primary and text is the fallback.

mod structured;
mod text;

use std::{fmt, str::FromStr, sync::Arc, sync::OnceLock, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{backend::Backend, Error, Result};

pub use structured::StructuredSource;
pub use text::TextSource;

/// Backend subcommand that answers shell completion requests.
pub const COMPLETION_COMMAND: &str = "__complete";

/// Lines of completion output starting with this marker are protocol directives.
pub const COMPLETION_DIRECTIVE_MARKER: char = ':';

/// One entry of the backend's command listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
}

impl CommandSummary {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One flag a backend command accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    pub long_name: String,
    pub short_name: Option<char>,
    pub accepts_value: bool,
    pub description: String,
}

impl FlagSpec {
    #[must_use]
    pub fn new(long_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: None,
            accepts_value: false,
            description: description.into(),
        }
    }

    #[must_use]
    pub const fn with_short(mut self, short: char) -> Self {
        self.short_name = Some(short);
        self
    }

    #[must_use]
    pub const fn taking_value(mut self) -> Self {
        self.accepts_value = true;
        self
    }
}

/// Parsed per-command help, before any wrapper-specific rewriting.
///
/// Every field may be empty: a command without aliases, usage, examples or
/// flags is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHelp {
    pub long_description: String,
    pub usage: Vec<String>,
    pub aliases: Vec<String>,
    pub flags: Vec<FlagSpec>,
    pub examples: String,
}

/// How passthru asks the backend to describe itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntrospectionMode {
    /// Structured first, text when no structured document is produced
    #[default]
    Auto,
    Structured,
    Text,
}

impl<'de> Deserialize<'de> for IntrospectionMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for IntrospectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "structured" | "json" => Ok(Self::Structured),
            "text" => Ok(Self::Text),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid introspection mode: {s}. Must be one of: auto, structured, text"
            ))),
        }
    }
}

impl fmt::Display for IntrospectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Structured => write!(f, "structured"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A way of reading the backend's self-description.
pub trait IntrospectionSource: Send + Sync {
    /// The mode this source implements.
    fn mode(&self) -> IntrospectionMode;

    /// List every backend command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] when no command list can be found.
    fn list_commands(
        &self,
        backend: &dyn Backend,
        timeout: Option<Duration>,
    ) -> Result<Vec<CommandSummary>>;

    /// Describe one command, or `None` when this source produced nothing usable.
    fn describe(
        &self,
        backend: &dyn Backend,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<CommandHelp>>;
}

const STRUCTURED_ONLY: &[&dyn IntrospectionSource] = &[&StructuredSource];
const TEXT_ONLY: &[&dyn IntrospectionSource] = &[&TextSource];
const STRUCTURED_THEN_TEXT: &[&dyn IntrospectionSource] = &[&StructuredSource, &TextSource];

/// Sources to consult for `mode`, in order.
fn sources_for(mode: IntrospectionMode) -> &'static [&'static dyn IntrospectionSource] {
    match mode {
        IntrospectionMode::Structured => STRUCTURED_ONLY,
        IntrospectionMode::Text => TEXT_ONLY,
        IntrospectionMode::Auto => STRUCTURED_THEN_TEXT,
    }
}

/// Drives introspection against one backend, remembering which source the
/// command listing came from so per-command queries use the same one.
pub struct Introspector {
    backend: Arc<dyn Backend>,
    mode: IntrospectionMode,
    timeout: Option<Duration>,
    resolved: OnceLock<IntrospectionMode>,
}

impl fmt::Debug for Introspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Introspector")
            .field("program", &self.backend.program())
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl Introspector {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, mode: IntrospectionMode) -> Self {
        Self {
            backend,
            mode,
            timeout: None,
            resolved: OnceLock::new(),
        }
    }

    /// Bound every introspection call; `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The mode actually in use: the configured one, or for `Auto` whichever
    /// source answered the command listing.
    #[must_use]
    pub fn active_mode(&self) -> IntrospectionMode {
        self.resolved.get().copied().unwrap_or(self.mode)
    }

    /// List every backend command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if neither allowed source finds a command list.
    pub fn list_commands(&self) -> Result<Vec<CommandSummary>> {
        let backend = self.backend.as_ref();
        let mut sources = sources_for(self.mode).iter().peekable();

        while let Some(source) = sources.next() {
            match source.list_commands(backend, self.timeout) {
                Ok(commands) => {
                    let mode = source.mode();
                    let _ = self.resolved.set(mode);
                    tracing::debug!(%mode, count = commands.len(), "discovered backend commands");
                    return Ok(commands);
                }
                Err(Error::Discovery(reason)) if sources.peek().is_some() => {
                    tracing::debug!(%reason, source = %source.mode(), "no command list, trying the next source");
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::discovery(backend.program(), "command list"))
    }

    /// Describe one command using the active source.
    ///
    /// Missing or unusable output degrades to an empty [`CommandHelp`].
    pub fn describe(&self, name: &str) -> Result<CommandHelp> {
        let backend = self.backend.as_ref();
        for source in sources_for(self.active_mode()) {
            if let Some(help) = source.describe(backend, name, self.timeout)? {
                return Ok(help);
            }
        }

        tracing::warn!(command = name, "backend gave no help for command; using an empty definition");
        Ok(CommandHelp::default())
    }

    /// Ask the backend's completion protocol for candidates.
    ///
    /// A failed completion call yields no candidates.
    pub fn complete(&self, name: &str, partial: &str) -> Result<Vec<String>> {
        let output = self.backend.run_captured(
            COMPLETION_COMMAND,
            &[name.to_string(), partial.to_string()],
            self.timeout,
        )?;

        if !output.succeeded {
            tracing::debug!(command = name, stderr = %output.stderr.trim(), "completion request failed");
            return Ok(Vec::new());
        }

        Ok(completion_candidates(&output.stdout))
    }

    /// The backend's own version string, `UNKNOWN` when it cannot tell.
    pub fn backend_version(&self) -> Result<String> {
        let output = self.backend.run_captured("-v", &[], self.timeout)?;
        let version = output.stdout.trim();
        if output.succeeded && !version.is_empty() {
            Ok(version.to_string())
        } else {
            Ok("UNKNOWN".to_string())
        }
    }
}

/// Candidate lines from completion output, without directives or blanks.
pub fn completion_candidates(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with(COMPLETION_DIRECTIVE_MARKER))
        .map(ToString::to_string)
        .collect()
}
