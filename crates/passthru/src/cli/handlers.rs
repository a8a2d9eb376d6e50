//! Handlers for each kind of command

use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;
use clap_complete::Shell;
use passthru_core::{config::BUILTIN_COMMANDS, exec, Shortcut};

use super::{
    commands::{base_cli, build_cli, CAPTURE, HELP_TARGET, SHELL},
    resolve::{positional_arguments, resolve_invocation},
};
use crate::{app::App, completions};

/// Format an error for user display
pub fn format_error(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            return format!("{msg}\nCause: {source_msg}");
        }
    }
    msg
}

pub fn handle_version(app: &App) -> Result<i32> {
    writeln!(std::io::stdout(), "{}", app.version()?)?;
    Ok(0)
}

/// Default command: every command with its description.
pub fn handle_list(app: &App) -> Result<i32> {
    let mut entries: Vec<(String, String)> = base_cli(app)
        .get_subcommands()
        .map(|cmd| {
            let about = cmd.get_about().map(ToString::to_string).unwrap_or_default();
            (cmd.get_name().to_string(), about)
        })
        .collect();

    entries.extend(
        app.catalog()
            .summaries()?
            .into_iter()
            .filter(|summary| {
                !BUILTIN_COMMANDS.contains(&summary.name.as_str())
                    && app.shortcut(&summary.name).is_none()
            })
            .map(|summary| (summary.name, summary.description)),
    );
    entries.sort();

    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = std::io::stdout().lock();

    writeln!(out, "Usage:")?;
    writeln!(out, "  {} <command> [options] [arguments]", app.name())?;
    writeln!(out)?;
    writeln!(out, "Available commands:")?;
    for (name, about) in &entries {
        writeln!(out, "  {name:<width$}  {about}")?;
    }
    Ok(0)
}

/// `help [command] [args...]`
///
/// Backend commands answer with the backend's own help, invocation rewritten
/// to the wrapper's; wrapper commands show their clap help.
pub fn handle_help(app: &App, sub_m: &ArgMatches) -> Result<i32> {
    let Some(target) = sub_m.get_one::<String>(HELP_TARGET) else {
        build_cli(app, None)?.print_long_help()?;
        return Ok(0);
    };

    if BUILTIN_COMMANDS.contains(&target.as_str()) || app.shortcut(target).is_some() {
        let mut root = base_cli(app);
        root.build();
        if let Some(cmd) = root.find_subcommand_mut(target) {
            cmd.print_long_help()?;
        }
        return Ok(0);
    }

    let definition = app.catalog().resolve(target)?;
    let help = definition.raw_help(&positional_arguments(sub_m))?;
    write!(std::io::stdout(), "{help}")?;
    Ok(0)
}

pub fn handle_completion(app: &App, sub_m: &ArgMatches) -> Result<i32> {
    let shell = sub_m
        .get_one::<Shell>(SHELL)
        .copied()
        .context("No shell given")?;
    completions::write_registration(shell, || base_cli(app))?;
    Ok(0)
}

/// Run `<backend> <shortcut command> <shortcut args...> <args...>`.
pub fn handle_shortcut(app: &App, shortcut: &Shortcut, sub_m: &ArgMatches) -> Result<i32> {
    let tokens: Vec<String> = shortcut
        .args
        .iter()
        .cloned()
        .chain(positional_arguments(sub_m))
        .collect();

    let mode = app.execution_mode(sub_m.get_flag(CAPTURE));
    let outcome = exec::run_pass_through(
        app.backend(),
        &shortcut.command,
        &tokens,
        mode,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )?;
    Ok(outcome.exit_code())
}

pub fn handle_pass_through(app: &App, name: &str, sub_m: &ArgMatches) -> Result<i32> {
    let definition = app.catalog().resolve(name)?;
    let invocation = resolve_invocation(sub_m);
    let mode = app.execution_mode(sub_m.get_flag(CAPTURE));

    let outcome = definition.execute(
        &invocation,
        mode,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )?;
    Ok(outcome.exit_code())
}
