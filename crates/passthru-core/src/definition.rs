//! Lazily synthesized command definitions
//!
//! A [`CommandDefinition`] starts as a name and a one-line description taken
//! from the command listing. The full schema (help text, usage, aliases,
//! flags) is built from the backend's per-command introspection the first
//! time anything asks for it, and never rebuilt.

use std::{
    collections::HashSet,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    exec::{self, ExecutionMode, Outcome},
    introspection::{CommandHelp, CommandSummary, FlagSpec, Introspector},
    reserved::ReservedOptions,
    translate::{self, ResolvedInvocation},
    Error, Result,
};

/// Name of the catch-all positional every pass-through command takes.
pub const PASS_THROUGH_ARGUMENT: &str = "arguments";

pub const JSON_OUTPUT_FLAG: &str = "json-output";
pub const JSON_OUTPUT_SHORT: char = 'j';

/// The structured-output flag every backend command is assumed to accept.
///
/// Registered on every pass-through command before introspection runs.
#[must_use]
pub fn json_output_flag() -> FlagSpec {
    FlagSpec::new(
        JSON_OUTPUT_FLAG,
        "If true, user-oriented output will be in JSON format.",
    )
    .with_short(JSON_OUTPUT_SHORT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    pub name: String,
    pub description: String,
}

/// Everything the host needs to present and parse one backend command.
///
/// `flags` holds the backend's own flags only; [`json_output_flag`] is added
/// by the host alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSchema {
    pub name: String,
    pub description: String,
    pub help_text: String,
    pub usage_lines: Vec<String>,
    pub aliases: Vec<String>,
    pub flags: Vec<FlagSpec>,
    pub positional: PositionalSpec,
    pub examples: String,
}

/// Shared by every definition in a catalog.
#[derive(Debug)]
pub struct SynthesisContext {
    pub introspector: Arc<Introspector>,
    pub reserved: Arc<ReservedOptions>,
    pub wrapper_name: String,
}

impl SynthesisContext {
    #[must_use]
    pub fn new(
        introspector: Arc<Introspector>,
        reserved: Arc<ReservedOptions>,
        wrapper_name: impl Into<String>,
    ) -> Self {
        Self {
            introspector,
            reserved,
            wrapper_name: wrapper_name.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        self.introspector.backend().program()
    }
}

/// Replace every `"<program> <command>"` in `text` with `"<wrapper> <command>"`.
#[must_use]
pub fn rewrite_invocation(text: &str, program: &str, wrapper: &str, command: &str) -> String {
    text.replace(&format!("{program} {command}"), &format!("{wrapper} {command}"))
}

/// Build a schema from parsed help.
///
/// # Errors
///
/// Returns [`crate::Error::FlagConflict`] when a backend flag uses a reserved
/// long or short name. Such flags are never silently dropped.
pub fn synthesize(
    summary: &CommandSummary,
    help: CommandHelp,
    program: &str,
    wrapper: &str,
    reserved: &ReservedOptions,
) -> Result<CommandSchema> {
    let name = summary.name.as_str();

    let examples = rewrite_invocation(help.examples.trim(), program, wrapper, name);
    let mut help_text = help.long_description.trim().to_string();
    if !examples.is_empty() {
        help_text = format!("{help_text}\n\nExamples:\n{examples}")
            .trim_start()
            .to_string();
    }

    let mut seen = HashSet::new();
    let aliases = help
        .aliases
        .into_iter()
        .filter(|alias| alias != name && seen.insert(alias.clone()))
        .collect();

    let prefix = format!("{program} {name}");
    let usage_lines = help
        .usage
        .iter()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(prefix.as_str()).unwrap_or(line).trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    Ok(CommandSchema {
        name: name.to_string(),
        description: summary.description.clone(),
        help_text,
        usage_lines,
        aliases,
        flags: select_flags(name, help.flags, reserved)?,
        positional: PositionalSpec {
            name: PASS_THROUGH_ARGUMENT.to_string(),
            description: format!(
                "Arguments to be passed through to the {program} command, if any"
            ),
        },
        examples,
    })
}

/// Keep the backend flags the host must register.
///
/// The backend's own help and json-output flags are provided by the host.
/// Any other flag whose long name or shorthand is already taken, whether by
/// the host or by an earlier backend flag, is a conflict.
fn select_flags(
    command: &str,
    flags: Vec<FlagSpec>,
    reserved: &ReservedOptions,
) -> Result<Vec<FlagSpec>> {
    let mut longs: HashSet<String> = HashSet::from([JSON_OUTPUT_FLAG.to_string()]);
    let mut shorts: HashSet<char> = HashSet::from([JSON_OUTPUT_SHORT]);
    let mut selected = Vec::with_capacity(flags.len());

    for flag in flags {
        if flag.long_name.eq_ignore_ascii_case("help")
            || flag.long_name.eq_ignore_ascii_case(JSON_OUTPUT_FLAG)
        {
            continue;
        }

        reserved.check(command, &flag.long_name, flag.short_name)?;

        let long_taken = !longs.insert(flag.long_name.to_lowercase());
        let short_taken = flag.short_name.is_some_and(|short| !shorts.insert(short));
        if long_taken || short_taken {
            return Err(Error::FlagConflict {
                flag: flag.long_name,
                command: command.to_string(),
            });
        }

        selected.push(flag);
    }

    Ok(selected)
}

/// One backend command, synthesized on first use.
#[derive(Debug)]
pub struct CommandDefinition {
    summary: CommandSummary,
    context: Arc<SynthesisContext>,
    schema: Mutex<Option<Arc<CommandSchema>>>,
}

impl CommandDefinition {
    #[must_use]
    pub const fn new(summary: CommandSummary, context: Arc<SynthesisContext>) -> Self {
        Self {
            summary,
            context,
            schema: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.summary.description
    }

    #[must_use]
    pub const fn summary(&self) -> &CommandSummary {
        &self.summary
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.schema
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Build the schema if it has not been built yet.
    ///
    /// The backend is asked at most once per command, even when several
    /// threads race here; later calls return the cached schema.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FlagConflict`] for a reserved flag, or the
    /// backend error when introspection could not run at all. Failures are
    /// not cached.
    pub fn ensure_initialized(&self) -> Result<Arc<CommandSchema>> {
        let mut slot = self.schema.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = slot.as_ref() {
            return Ok(Arc::clone(schema));
        }

        let help = self.context.introspector.describe(self.name())?;
        let schema = Arc::new(synthesize(
            &self.summary,
            help,
            self.context.program(),
            &self.context.wrapper_name,
            &self.context.reserved,
        )?);
        tracing::debug!(command = self.name(), flags = schema.flags.len(), "synthesized command");

        *slot = Some(Arc::clone(&schema));
        Ok(schema)
    }

    pub fn schema(&self) -> Result<Arc<CommandSchema>> {
        self.ensure_initialized()
    }

    pub fn help_text(&self) -> Result<String> {
        Ok(self.ensure_initialized()?.help_text.clone())
    }

    pub fn aliases(&self) -> Result<Vec<String>> {
        Ok(self.ensure_initialized()?.aliases.clone())
    }

    /// Completion candidates for a partial positional value.
    pub fn complete(&self, partial: &str) -> Result<Vec<String>> {
        self.context.introspector.complete(self.name(), partial)
    }

    /// The backend's own help for this command, with its invocation prefix
    /// rewritten to the wrapper's.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be run.
    pub fn raw_help(&self, args: &[String]) -> Result<String> {
        let mut help_args = vec!["-h".to_string()];
        help_args.extend(args.iter().cloned());

        let introspector = &self.context.introspector;
        let output = introspector
            .backend()
            .run_captured(self.name(), &help_args, introspector.timeout())?;

        Ok(rewrite_invocation(
            output.text(),
            self.context.program(),
            &self.context.wrapper_name,
            self.name(),
        ))
    }

    /// Forward `invocation` to the backend.
    ///
    /// # Errors
    ///
    /// Propagates backend spawn and timeout errors. A backend that runs and
    /// fails is reported as [`Outcome::Failure`].
    pub fn execute(
        &self,
        invocation: &ResolvedInvocation,
        mode: ExecutionMode,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Outcome> {
        let tokens = translate::translate(invocation, &self.context.reserved);
        exec::run_pass_through(
            self.context.introspector.backend(),
            self.name(),
            &tokens,
            mode,
            out,
            err,
        )
    }
}
