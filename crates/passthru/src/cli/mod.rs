//! Command-line surface: command tree, argv inspection, handlers

pub mod commands;
pub mod handlers;
pub mod input;
pub mod reserved;
pub mod resolve;
pub mod setup;

pub use commands::{base_cli, build_cli};
