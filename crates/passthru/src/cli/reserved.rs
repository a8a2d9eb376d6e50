//! Reserved option registry built from the wrapper's own global options

use clap::Command;
use passthru_core::ReservedOptions;

use super::commands::global_args;

/// Long and short names owned by the wrapper.
///
/// Read from the global arguments every command carries, plus the help flag
/// clap generates.
pub fn reserved_options() -> ReservedOptions {
    let probe = Command::new("probe").args(global_args());

    probe
        .get_arguments()
        .filter_map(|arg| arg.get_long().map(|long| (long, arg.get_short())))
        .fold(
            ReservedOptions::new().with("help", Some('h')),
            |reserved, (long, short)| reserved.with(long, short),
        )
}
