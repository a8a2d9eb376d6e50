//! Structured (JSON) introspection
//!
//! Listing document: `{Commands, AdditionalHelpCommands, AdditionalCommands}`,
//! each an array of `{Name, Description}`. Command document: `{LongDescription,
//! Example, Aliases, Usage, Flags: [{Name, Shorthand, Usage}]}`.

use std::{collections::HashSet, time::Duration};

use serde::Deserialize;
use serde_json::Value;

use super::{CommandHelp, CommandSummary, FlagSpec, IntrospectionMode, IntrospectionSource};
use crate::{backend::Backend, Error, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CommandListDocument {
    commands: Option<Vec<CommandEntry>>,
    additional_help_commands: Option<Vec<CommandEntry>>,
    additional_commands: Option<Vec<CommandEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CommandEntry {
    name: String,
    description: Option<String>,
}

/// Reads the backend's JSON self-description.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredSource;

impl IntrospectionSource for StructuredSource {
    fn mode(&self) -> IntrospectionMode {
        IntrospectionMode::Structured
    }

    fn list_commands(
        &self,
        backend: &dyn Backend,
        timeout: Option<Duration>,
    ) -> Result<Vec<CommandSummary>> {
        let raw = backend
            .run_structured("help", &[], timeout)?
            .ok_or_else(|| Error::discovery(backend.program(), "command list"))?;

        parse_command_list(raw).ok_or_else(|| Error::discovery(backend.program(), "command list"))
    }

    fn describe(
        &self,
        backend: &dyn Backend,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<CommandHelp>> {
        let raw = backend.run_structured("help", &[name.to_string()], timeout)?;
        Ok(raw.as_ref().map(parse_command_document))
    }
}

/// Merge the listing arrays, first occurrence of a name wins.
///
/// `None` when the document has no usable entries.
fn parse_command_list(raw: Value) -> Option<Vec<CommandSummary>> {
    let document: CommandListDocument = serde_json::from_value(raw)
        .map_err(|e| tracing::debug!(error = %e, "command list document has an unexpected shape"))
        .ok()?;

    let mut seen = HashSet::new();
    let commands: Vec<CommandSummary> = [
        document.commands,
        document.additional_help_commands,
        document.additional_commands,
    ]
    .into_iter()
    .flatten()
    .flatten()
    .filter(|entry| !entry.name.trim().is_empty())
    .filter(|entry| seen.insert(entry.name.clone()))
    .map(|entry| {
        CommandSummary::new(
            entry.name.trim(),
            entry.description.unwrap_or_default().trim(),
        )
    })
    .collect();

    if commands.is_empty() {
        None
    } else {
        Some(commands)
    }
}

/// Read each field on its own so one malformed field only empties itself.
fn parse_command_document(raw: &Value) -> CommandHelp {
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let aliases = raw
        .get("Aliases")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    let flags = raw
        .get("Flags")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_flag).collect())
        .unwrap_or_default();

    CommandHelp {
        long_description: text("LongDescription"),
        usage: text("Usage").lines().map(ToString::to_string).collect(),
        aliases,
        flags,
        examples: text("Example"),
    }
}

fn parse_flag(raw: &Value) -> Option<FlagSpec> {
    let name = raw.get("Name").and_then(Value::as_str)?.trim();
    if name.is_empty() {
        return None;
    }

    let short_name = raw
        .get("Shorthand")
        .and_then(Value::as_str)
        .and_then(single_char);
    let description = raw
        .get("Usage")
        .and_then(Value::as_str)
        .unwrap_or_default();

    // The document does not say whether a value is expected; synthesized
    // flags take an optional value either way.
    Some(FlagSpec {
        long_name: name.to_string(),
        short_name,
        accepts_value: true,
        description: description.trim().to_string(),
    })
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
