//! CLI command definitions using `clap`
//!
//! The tree is rebuilt on every run. Built-in commands and configured
//! shortcuts are always present; backend commands come from the catalog.
//! Only the command actually being run is synthesized in full, the rest are
//! stubs carrying their name and description.

use std::{ffi::OsStr, sync::Arc};

use clap::{builder::StyledStr, Arg, ArgAction, Command as ClapCommand};
use clap_complete::{
    engine::{ArgValueCompleter, CompletionCandidate},
    Shell,
};
use passthru_core::{
    config::BUILTIN_COMMANDS,
    definition::{json_output_flag, PASS_THROUGH_ARGUMENT},
    CommandDefinition, CommandSchema, FlagSpec, Shortcut,
};

use crate::app::App;

pub const LIST_COMMANDS: &str = "list-commands";
pub const HELP: &str = "help";
pub const COMPLETION: &str = "completion";

/// Arg id of the help command's target.
pub const HELP_TARGET: &str = "command_name";
pub const SHELL: &str = "shell";
pub const VERBOSE: &str = "verbose";
pub const CAPTURE: &str = "capture";

/// Backend flags are keyed by `--<long>` so they never clash with the
/// positional or the wrapper's own ids.
pub fn flag_id(long: &str) -> String {
    format!("--{long}")
}

/// Options every command accepts. These names are reserved: no backend flag
/// may reuse them.
pub fn global_args() -> Vec<Arg> {
    vec![
        Arg::new(VERBOSE)
            .short('v')
            .long(VERBOSE)
            .action(ArgAction::Count)
            .global(true)
            .help("Increase wrapper log output (-v info, -vv debug, -vvv trace)"),
        Arg::new(CAPTURE)
            .long(CAPTURE)
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Capture the backend's output instead of attaching it to the terminal"),
    ]
}

/// Root command with the built-ins and shortcuts, without backend commands.
pub fn base_cli(app: &App) -> ClapCommand {
    let program = app.backend().program().to_string();

    let root = ClapCommand::new(app.name().to_string())
        .about(format!("Run {program} commands through {}", app.name()))
        .args(global_args())
        .disable_help_subcommand(true)
        .subcommand(cmd_list_commands())
        .subcommand(cmd_help())
        .subcommand(cmd_completion());

    app.config()
        .shortcuts
        .iter()
        .fold(root, |root, (name, shortcut)| {
            root.subcommand(cmd_shortcut(name, shortcut, &program))
        })
}

/// Full command tree, with `focus` synthesized from the backend's help.
///
/// # Errors
///
/// Returns the catalog error when the backend's commands cannot be listed,
/// or a synthesis error (such as a flag conflict) for `focus`.
pub fn build_cli(app: &App, focus: Option<&str>) -> passthru_core::Result<ClapCommand> {
    let mut root = base_cli(app);

    for summary in app.catalog().summaries()? {
        let name = summary.name.as_str();
        if BUILTIN_COMMANDS.contains(&name) || app.shortcut(name).is_some() {
            tracing::debug!(command = name, "backend command shadowed by a wrapper command");
            continue;
        }

        let definition = app.catalog().resolve(name)?;
        let command = if focus == Some(name) {
            let schema = definition.ensure_initialized()?;
            cmd_pass_through(definition, &schema, app.name())
        } else {
            cmd_stub(definition)
        };
        root = root.subcommand(command);
    }

    Ok(root)
}

fn cmd_list_commands() -> ClapCommand {
    ClapCommand::new(LIST_COMMANDS).about("List commands")
}

fn cmd_help() -> ClapCommand {
    ClapCommand::new(HELP)
        .about("Display help for a command")
        .arg(Arg::new(HELP_TARGET).help("The command name"))
        .arg(
            Arg::new(PASS_THROUGH_ARGUMENT)
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Arguments and flags for the command, forwarded with the help request"),
        )
}

fn cmd_completion() -> ClapCommand {
    ClapCommand::new(COMPLETION)
        .about("Print a shell completion registration script")
        .arg(
            Arg::new(SHELL)
                .required(true)
                .value_parser(clap::value_parser!(Shell))
                .help("Shell to generate the script for"),
        )
}

fn cmd_shortcut(name: &str, shortcut: &Shortcut, program: &str) -> ClapCommand {
    let target = std::iter::once(shortcut.command.as_str())
        .chain(shortcut.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let about = if shortcut.description.is_empty() {
        format!("Shortcut for \"{program} {target}\"")
    } else {
        shortcut.description.clone()
    };

    ClapCommand::new(name.to_string())
        .about(about)
        .after_help(format!("Runs: {program} {target} [arguments...]"))
        .arg(
            Arg::new(PASS_THROUGH_ARGUMENT)
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help(format!("Arguments appended to \"{program} {target}\"")),
        )
}

fn cmd_stub(definition: Arc<CommandDefinition>) -> ClapCommand {
    ClapCommand::new(definition.name().to_string())
        .about(definition.description().to_string())
        .args_override_self(true)
        .arg(flag_arg(&json_output_flag()))
        .arg(arguments_arg(definition, "Arguments to be passed through, if any".to_string()))
}

fn cmd_pass_through(
    definition: Arc<CommandDefinition>,
    schema: &CommandSchema,
    wrapper: &str,
) -> ClapCommand {
    let mut cmd = ClapCommand::new(schema.name.clone())
        .about(schema.description.clone())
        .args_override_self(true);

    if !schema.help_text.is_empty() {
        cmd = cmd.long_about(schema.help_text.clone());
    }
    if !schema.usage_lines.is_empty() {
        let usage = schema
            .usage_lines
            .iter()
            .map(|line| format!("{wrapper} {} {line}", schema.name))
            .collect::<Vec<_>>()
            .join("\n       ");
        cmd = cmd.override_usage(usage);
    }
    if !schema.aliases.is_empty() {
        cmd = cmd.after_help(format!("Aliases: {}", schema.aliases.join(", ")));
    }

    cmd.arg(flag_arg(&json_output_flag()))
        .args(schema.flags.iter().map(flag_arg))
        .arg(arguments_arg(definition, schema.positional.description.clone()))
}

/// Every backend flag takes an optional value; given bare it resolves to an
/// empty value. Flags not known to take a value need `--flag=value`, so a
/// following word stays a positional.
fn flag_arg(flag: &FlagSpec) -> Arg {
    let arg = Arg::new(flag_id(&flag.long_name))
        .long(flag.long_name.clone())
        .help(flag.description.clone())
        .action(ArgAction::Set)
        .num_args(0..=1)
        .default_missing_value("")
        .require_equals(!flag.accepts_value)
        .value_name(if flag.accepts_value { "VALUE" } else { "BOOL" });

    match flag.short_name {
        Some(short) => arg.short(short),
        None => arg,
    }
}

fn arguments_arg(definition: Arc<CommandDefinition>, help: String) -> Arg {
    Arg::new(PASS_THROUGH_ARGUMENT)
        .num_args(0..)
        .action(ArgAction::Append)
        .help(help)
        .add(ArgValueCompleter::new(move |current: &OsStr| {
            let partial = current.to_string_lossy();
            definition
                .complete(&partial)
                .unwrap_or_default()
                .into_iter()
                .map(completion_candidate)
                .collect::<Vec<_>>()
        }))
}

/// Backend candidates may carry a tab-separated description.
fn completion_candidate(line: String) -> CompletionCandidate {
    match line.split_once('\t') {
        Some((value, help)) => {
            CompletionCandidate::new(value.to_string()).help(Some(StyledStr::from(help.to_string())))
        }
        None => CompletionCandidate::new(line),
    }
}
