//! Turning clap matches into a pass-through invocation

use clap::{parser::ValueSource, ArgMatches};
use passthru_core::{definition::PASS_THROUGH_ARGUMENT, OptionValue, Positional, ResolvedInvocation};

use super::commands::flag_id;

/// Positional arguments given to a pass-through or shortcut command.
pub fn positional_arguments(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(PASS_THROUGH_ARGUMENT)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Build the invocation for a pass-through command.
///
/// Options keep the order they appeared on the command line. A flag given
/// bare resolves to an empty value.
pub fn resolve_invocation(matches: &ArgMatches) -> ResolvedInvocation {
    let prefix = flag_id("");

    let mut options: Vec<(usize, String, OptionValue)> = matches
        .ids()
        .filter_map(|id| {
            let long = id.as_str().strip_prefix(prefix.as_str())?;
            let value = match matches.value_source(id.as_str()) {
                Some(ValueSource::CommandLine) => matches
                    .get_one::<String>(id.as_str())
                    .map_or(OptionValue::Switch(true), |v| OptionValue::Value(v.clone())),
                _ => OptionValue::Unset,
            };
            let position = matches
                .index_of(id.as_str())
                .unwrap_or(usize::MAX);
            Some((position, long.to_string(), value))
        })
        .collect();
    options.sort_by_key(|(position, _, _)| *position);

    let invocation = ResolvedInvocation::new().positional(Positional::many(
        PASS_THROUGH_ARGUMENT,
        positional_arguments(matches),
    ));

    options
        .into_iter()
        .fold(invocation, |invocation, (_, long, value)| invocation.option(long, value))
}
