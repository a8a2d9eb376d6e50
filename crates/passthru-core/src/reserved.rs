//! Option names owned by the hosting CLI
//!
//! Backend flags must never reuse these. The set is computed once from the
//! host's global options and shared read-only by every command definition.

use std::collections::BTreeSet;

use crate::{Error, Result};

/// Long and short option identifiers reserved by the wrapper itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedOptions {
    long: BTreeSet<String>,
    short: BTreeSet<char>,
}

impl ReservedOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a long name and, optionally, its shorthand.
    #[must_use]
    pub fn with(mut self, long: &str, short: Option<char>) -> Self {
        self.insert(long, short);
        self
    }

    pub fn insert(&mut self, long: &str, short: Option<char>) {
        self.long.insert(long.to_lowercase());
        if let Some(c) = short {
            self.short.insert(c);
        }
    }

    #[must_use]
    pub fn is_reserved_long(&self, name: &str) -> bool {
        self.long.contains(&name.to_lowercase())
    }

    #[must_use]
    pub fn is_reserved_short(&self, short: char) -> bool {
        self.short.contains(&short)
    }

    /// Reject a backend flag whose long name or shorthand is reserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FlagConflict`] naming the flag and the command.
    pub fn check(&self, command: &str, long: &str, short: Option<char>) -> Result<()> {
        let long_taken = self.is_reserved_long(long);
        let short_taken = short.is_some_and(|c| self.is_reserved_short(c));

        if long_taken || short_taken {
            return Err(Error::FlagConflict {
                flag: long.to_string(),
                command: command.to_string(),
            });
        }
        Ok(())
    }
}
