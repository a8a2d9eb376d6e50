//! Decisions taken from raw argv before clap parses it
//!
//! The command tree depends on which command is being run (only that one is
//! fully synthesized), and `--version` means different things depending on
//! the command, so both are read straight from the arguments.

/// Environment variable that switches the binary into completion mode.
pub const COMPLETE_ENV: &str = "COMPLETE";

/// First token that is not an option, skipping the program name.
///
/// Wrapper-level options take no values, so the first bare word is the
/// command. Everything after `--` is positional.
pub fn first_argument(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--" {
            return rest.next().map(String::as_str);
        }
        if !arg.starts_with('-') || arg == "-" {
            return Some(arg);
        }
    }
    None
}

/// Whether `--version`/`-V` is the wrapper's to answer.
///
/// Only with no command or with `help`; for any other command the flag is
/// the backend's.
pub fn version_requested(args: &[String]) -> bool {
    let flagged = args
        .iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "--version" || arg == "-V");

    flagged && matches!(first_argument(args), None | Some("help"))
}

/// How many times `-v`/`--verbose` was given, `-vv` counting twice.
pub fn verbosity(args: &[String]) -> u8 {
    let count = args
        .iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .map(|arg| match arg.as_str() {
            "--verbose" => 1,
            short if is_verbose_cluster(short) => short.len() - 1,
            _ => 0,
        })
        .sum::<usize>();

    u8::try_from(count).unwrap_or(u8::MAX)
}

fn is_verbose_cluster(arg: &str) -> bool {
    arg.strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == 'v'))
}

/// The command being completed when running under `COMPLETE=<shell>`.
///
/// The shell calls `<bin> -- <bin> <words...>`; the command is the first
/// bare word after the second program name.
pub fn completion_focus(args: &[String]) -> Option<&str> {
    let separator = args.iter().position(|arg| arg == "--")?;
    let words = args.get(separator + 1..)?;
    first_argument(words)
}
