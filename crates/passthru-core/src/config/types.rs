//! Configuration type definitions

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{exec::InteractivePolicy, introspection::IntrospectionMode};

/// Commands the wrapper itself provides; backend commands and shortcuts with
/// these names are shadowed.
pub const BUILTIN_COMMANDS: &[&str] = &["help", "list-commands", "completion"];

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Name the wrapper presents itself as, in help and rewritten examples
    pub name: String,
    /// Backend executable, a bare name searched on PATH or a path
    pub backend: String,
    pub introspection: IntrospectionMode,
    /// 0 disables the timeout
    pub introspection_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_timeout_secs: Option<u64>,
    pub interactive: InteractivePolicy,
    pub shortcuts: BTreeMap<String, Shortcut>,
}

/// A wrapper command that runs a fixed backend command with preset arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shortcut {
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    #[must_use]
    pub const fn introspection_timeout(&self) -> Option<Duration> {
        match self.introspection_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    #[must_use]
    pub fn capture_timeout(&self) -> Option<Duration> {
        self.capture_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
