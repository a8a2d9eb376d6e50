//! Default configuration values

use std::collections::BTreeMap;

use super::types::Config;
use crate::{exec::InteractivePolicy, introspection::IntrospectionMode};

pub(super) const DEFAULT_NAME: &str = "passthru";
pub(super) const DEFAULT_BACKEND: &str = "ddev";
pub(super) const DEFAULT_INTROSPECTION_TIMEOUT_SECS: u64 = 30;

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            backend: DEFAULT_BACKEND.to_string(),
            introspection: IntrospectionMode::Auto,
            introspection_timeout_secs: DEFAULT_INTROSPECTION_TIMEOUT_SECS,
            capture_timeout_secs: None,
            interactive: InteractivePolicy::Auto,
            shortcuts: BTreeMap::new(),
        }
    }
}
