//! Help-text introspection
//!
//! Reads the human-readable help the backend prints for `<backend> help` and
//! `<backend> <command> -h`. Sections are introduced by a line holding only
//! their header (`Usage:`, `Aliases:`, `Examples:`, `Flags:`) and run to the
//! next blank line or the end of the output.

use std::{sync::OnceLock, time::Duration};

use regex::Regex;

use super::{CommandHelp, CommandSummary, FlagSpec, IntrospectionMode, IntrospectionSource};
use crate::{backend::Backend, Error, Result};

const COMMANDS_HEADER: &str = "Available Commands:";
const USAGE_HEADER: &str = "Usage:";
const ALIASES_HEADER: &str = "Aliases:";
const EXAMPLES_HEADER: &str = "Examples:";
const FLAGS_HEADER: &str = "Flags:";

/// Reads the backend's plain help output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSource;

impl IntrospectionSource for TextSource {
    fn mode(&self) -> IntrospectionMode {
        IntrospectionMode::Text
    }

    fn list_commands(
        &self,
        backend: &dyn Backend,
        timeout: Option<Duration>,
    ) -> Result<Vec<CommandSummary>> {
        let output = backend.run_captured("help", &[], timeout)?;
        parse_command_list(backend.program(), output.text())
    }

    fn describe(
        &self,
        backend: &dyn Backend,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<CommandHelp>> {
        let output = backend.run_captured(name, &["-h".to_string()], timeout)?;
        let text = output.text();
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_command_help(text)))
    }
}

fn command_block_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(?s){}\n(.+?)(?:\n[ \t]*\n|\z)",
            regex::escape(COMMANDS_HEADER)
        );
        Regex::new(&pattern).ok()
    })
    .as_ref()
}

fn command_line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*([\w-]+)[ \t]+(\S.*?)[ \t]*$").ok())
        .as_ref()
}

fn flag_line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:-(?P<short>\w),\s+)?--(?P<long>[\w][\w-]*)(?P<rest>.*)$").ok()
    })
    .as_ref()
}

/// Parse the `Available Commands:` block of the top-level help.
///
/// # Errors
///
/// Returns [`Error::Discovery`] when the block is missing or lists nothing.
fn parse_command_list(program: &str, text: &str) -> Result<Vec<CommandSummary>> {
    let text = normalize(text);

    let block = command_block_regex()
        .and_then(|re| re.captures(&text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::discovery(program, "command list"))?;

    let commands: Vec<CommandSummary> = block
        .lines()
        .filter_map(|line| {
            let caps = command_line_regex()?.captures(line)?;
            Some(CommandSummary::new(&caps[1], &caps[2]))
        })
        .collect();

    if commands.is_empty() {
        return Err(Error::discovery(program, "commands"));
    }
    Ok(commands)
}

/// Parse the help printed by `<backend> <command> -h`.
///
/// Missing sections leave their field empty.
fn parse_command_help(text: &str) -> CommandHelp {
    let text = normalize(text);

    let long_description = text
        .lines()
        .take_while(|line| !is_header(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let usage = section(&text, USAGE_HEADER)
        .iter()
        .map(|line| line.trim().to_string())
        .collect();

    let aliases = section(&text, ALIASES_HEADER)
        .iter()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(ToString::to_string)
        .collect();

    let flags = section(&text, FLAGS_HEADER)
        .iter()
        .filter_map(|line| parse_flag_line(line))
        .collect();

    CommandHelp {
        long_description,
        usage,
        aliases,
        flags,
        examples: dedent(&section(&text, EXAMPLES_HEADER)),
    }
}

fn parse_flag_line(line: &str) -> Option<FlagSpec> {
    let caps = flag_line_regex()?.captures(line)?;
    let (value_type, description) = split_value_type(caps.name("rest").map_or("", |m| m.as_str()));

    Some(FlagSpec {
        long_name: caps["long"].to_string(),
        short_name: caps.name("short").and_then(|m| m.as_str().chars().next()),
        accepts_value: value_type.is_some(),
        description: description.to_string(),
    })
}

/// `" string   Start only these services"` splits into the value type and the
/// description. The type word follows the long name after a single space;
/// the description is separated by at least two.
fn split_value_type(rest: &str) -> (Option<&str>, &str) {
    if let Some(after) = rest.strip_prefix(' ') {
        if !after.starts_with(char::is_whitespace) {
            let (word, tail) = after.split_at(after.find(char::is_whitespace).unwrap_or(after.len()));
            if tail.is_empty() || tail.starts_with("  ") {
                return (Some(word), tail.trim());
            }
        }
    }
    (None, rest.trim())
}

/// Lines after a line holding exactly `header`, up to a blank line or the end.
fn section<'a>(text: &'a str, header: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| line.trim() != header)
        .skip(1)
        .take_while(|line| !line.trim().is_empty())
        .collect()
}

/// Section headers start in the first column and end with a colon.
fn is_header(line: &str) -> bool {
    if line.starts_with(char::is_whitespace) {
        return false;
    }
    line.trim_end()
        .strip_suffix(':')
        .is_some_and(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
        })
}

fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}
