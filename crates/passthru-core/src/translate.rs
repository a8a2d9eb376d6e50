//! Pass-through translation
//!
//! Turns a parsed invocation back into the flat token list handed to the
//! backend. Positionals come first in their original order, then options in
//! the order they were resolved.

use crate::reserved::ReservedOptions;

/// Positional slot holding the wrapper's own command name; never forwarded.
pub const COMMAND_POSITIONAL: &str = "command";

/// Value of one resolved option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionValue {
    /// The flag was not given on the command line
    #[default]
    Unset,
    /// A boolean toggle; `false` means not toggled
    Switch(bool),
    /// A flag given with a value, possibly empty (`--name` alone)
    Value(String),
}

/// Value of one positional slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionalValue {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    pub name: String,
    pub value: PositionalValue,
}

impl Positional {
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PositionalValue::Single(value.into()),
        }
    }

    #[must_use]
    pub fn many(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            value: PositionalValue::Many(values),
        }
    }
}

/// A parsed command line, ready to be forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInvocation {
    pub positionals: Vec<Positional>,
    pub options: Vec<(String, OptionValue)>,
}

impl ResolvedInvocation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn positional(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.push((name.into(), value));
        self
    }
}

/// Flatten `invocation` into backend tokens.
///
/// Unset options and options whose long name is reserved are dropped.
/// `Value(v)` becomes `--name=v`; an empty value or `Switch(true)` becomes a
/// bare `--name`.
#[must_use]
pub fn translate(invocation: &ResolvedInvocation, reserved: &ReservedOptions) -> Vec<String> {
    let positionals = invocation
        .positionals
        .iter()
        .filter(|p| p.name != COMMAND_POSITIONAL)
        .flat_map(|p| match &p.value {
            PositionalValue::Single(value) => vec![value.clone()],
            PositionalValue::Many(values) => values.clone(),
        });

    let options = invocation
        .options
        .iter()
        .filter(|(name, _)| !reserved.is_reserved_long(name))
        .filter_map(|(name, value)| match value {
            OptionValue::Unset | OptionValue::Switch(false) => None,
            OptionValue::Switch(true) => Some(format!("--{name}")),
            OptionValue::Value(v) if v.is_empty() => Some(format!("--{name}")),
            OptionValue::Value(v) => Some(format!("--{name}={v}")),
        });

    positionals.chain(options).collect()
}
