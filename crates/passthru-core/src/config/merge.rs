//! Configuration merging
//!
//! Later layers override earlier ones. A field left at its default in the
//! overriding layer keeps the earlier value.

use super::{
    defaults::{DEFAULT_BACKEND, DEFAULT_INTROSPECTION_TIMEOUT_SECS, DEFAULT_NAME},
    types::Config,
};
use crate::{exec::InteractivePolicy, introspection::IntrospectionMode};

impl Config {
    /// Merge another config into this one (other takes precedence).
    ///
    /// Shortcuts are merged by name; a shortcut in `other` replaces the one
    /// with the same name in `self`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let mut shortcuts = self.shortcuts;
        shortcuts.extend(other.shortcuts);

        Self {
            name: if other.name == DEFAULT_NAME {
                self.name
            } else {
                other.name
            },
            backend: if other.backend == DEFAULT_BACKEND {
                self.backend
            } else {
                other.backend
            },
            introspection: if other.introspection == IntrospectionMode::Auto {
                self.introspection
            } else {
                other.introspection
            },
            introspection_timeout_secs: if other.introspection_timeout_secs
                == DEFAULT_INTROSPECTION_TIMEOUT_SECS
            {
                self.introspection_timeout_secs
            } else {
                other.introspection_timeout_secs
            },
            capture_timeout_secs: other.capture_timeout_secs.or(self.capture_timeout_secs),
            interactive: if other.interactive == InteractivePolicy::Auto {
                self.interactive
            } else {
                other.interactive
            },
            shortcuts,
        }
    }
}
