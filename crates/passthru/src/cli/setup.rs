//! Logging initialization
//!
//! Wrapper logs go to stderr so stdout stays the backend's. The default level
//! is `warn`; each `-v` raises it one step. `RUST_LOG` directives still apply.

use anyhow::Result;
use tracing::Level;

/// Level for a `-v` count.
pub const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing subscriber for logging
///
/// # Errors
/// Returns an error if the subscriber initialization fails
pub fn init_tracing(verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level_for(verbosity).into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
