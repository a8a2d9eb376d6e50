//! Configuration validation

use super::types::{Config, BUILTIN_COMMANDS};
use crate::{Error, Result};

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for empty names, a wrapper name with
    /// whitespace, or a shortcut that is unnamed, has no command, or would
    /// shadow a built-in command.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.name.contains(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!(
                "name must be a single non-empty word, got '{}'",
                self.name
            )));
        }

        if self.backend.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "backend cannot be empty - provide the backend executable name or path".to_string(),
            ));
        }

        self.shortcuts.iter().try_for_each(|(name, shortcut)| {
            if name.trim().is_empty() || name.starts_with('-') {
                return Err(Error::InvalidConfig(format!(
                    "invalid shortcut name '{name}'"
                )));
            }
            if BUILTIN_COMMANDS.contains(&name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "shortcut '{name}' would shadow a built-in command"
                )));
            }
            if shortcut.command.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "shortcut '{name}' needs a backend command"
                )));
            }
            Ok(())
        })
    }
}
