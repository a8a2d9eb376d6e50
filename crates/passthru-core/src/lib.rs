//! # passthru core
//!
//! Runtime discovery and pass-through of a backend tool's commands.
//!
//! The backend is asked once for its command list ([`CommandCatalog`]); a
//! command's full definition is synthesized from the backend's own help the
//! first time it is used ([`CommandDefinition`]); a parsed invocation is
//! flattened back into backend arguments ([`translate()`]) and run
//! ([`exec::run_pass_through`]).
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![forbid(unsafe_code)]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod definition;
mod error;
pub mod exec;
pub mod introspection;
pub mod reserved;
pub mod translate;

pub use backend::{Backend, CapturedOutput, ProcessBackend};
pub use catalog::CommandCatalog;
pub use config::{load_config, Config, Shortcut};
pub use definition::{CommandDefinition, CommandSchema, SynthesisContext};
pub use error::{Error, Result};
pub use exec::{ExecutionMode, InteractivePolicy, Outcome};
pub use introspection::{CommandHelp, CommandSummary, FlagSpec, IntrospectionMode, Introspector};
pub use reserved::ReservedOptions;
pub use translate::{translate, OptionValue, Positional, PositionalValue, ResolvedInvocation};
