//! passthru library interface
//!
//! The binary is a thin shell over [`app::run_cli`]; everything it needs is
//! exposed here so integration tests can drive the wrapper against a stub
//! backend.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app;
pub mod cli;
pub mod completions;

pub use app::{run_cli, App};
