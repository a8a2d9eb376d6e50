//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/passthru/config.toml`, or the file named by
//!    `PASSTHRU_CONFIG`
//! 3. Project config: `.passthru/config.toml`
//! 4. Environment variables: `PASSTHRU_*`
//!
//! # Example Config
//!
//! ```toml
//! name = "dw"
//! backend = "ddev"
//! introspection = "auto"
//! introspection_timeout_secs = 30
//!
//! [shortcuts.artisan]
//! description = "Run artisan in the web container"
//! command = "exec"
//! args = ["php", "artisan"]
//! ```

mod defaults;
mod load;
mod merge;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;

pub use load::{global_config_path, load_config, load_toml_file, project_config_path};
pub use types::{Config, Shortcut, BUILTIN_COMMANDS};
