//! Application state and command dispatch

use std::sync::Arc;

use anyhow::Result;
use passthru_core::{
    config::BUILTIN_COMMANDS,
    exec::{self, ExecutionMode},
    Backend, CommandCatalog, Config, Introspector, ProcessBackend, Shortcut, SynthesisContext,
};

use crate::cli::{
    commands::{build_cli, COMPLETION, HELP, LIST_COMMANDS},
    handlers, input,
    reserved::reserved_options,
};

/// Everything one run of the wrapper needs.
#[derive(Debug)]
pub struct App {
    config: Config,
    context: Arc<SynthesisContext>,
    catalog: CommandCatalog,
}

impl App {
    /// Locate the configured backend and prepare the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`passthru_core::Error::BackendNotFound`] when the backend is
    /// not installed.
    pub fn new(config: Config) -> passthru_core::Result<Self> {
        let backend = ProcessBackend::new(&config.backend)?;
        tracing::debug!(executable = %backend.executable().display(), "backend located");
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        let introspector = Introspector::new(backend, config.introspection)
            .with_timeout(config.introspection_timeout());
        let context = Arc::new(SynthesisContext::new(
            Arc::new(introspector),
            Arc::new(reserved_options()),
            config.name.clone(),
        ));
        let catalog = CommandCatalog::new(Arc::clone(&context));

        Self {
            config,
            context,
            catalog,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &dyn Backend {
        self.context.introspector.backend()
    }

    pub fn shortcut(&self, name: &str) -> Option<&Shortcut> {
        self.config.shortcuts.get(name)
    }

    /// Whether `name` is a built-in, a shortcut or a backend command.
    ///
    /// # Errors
    ///
    /// Returns the catalog error when `name` is not a wrapper command and the
    /// backend's commands cannot be listed.
    pub fn knows(&self, name: &str) -> passthru_core::Result<bool> {
        if BUILTIN_COMMANDS.contains(&name) || self.shortcut(name).is_some() {
            return Ok(true);
        }
        self.catalog.has(name)
    }

    /// `<wrapper> (<backend version>)`
    pub fn version(&self) -> passthru_core::Result<String> {
        let backend_version = self.context.introspector.backend_version()?;
        Ok(format!("{} ({backend_version})", self.name()))
    }

    pub fn execution_mode(&self, capture_requested: bool) -> ExecutionMode {
        ExecutionMode::select(
            self.config.interactive,
            capture_requested,
            exec::stdio_is_terminal(),
            self.config.capture_timeout(),
        )
    }
}

/// Parse `args` and run the selected command, returning the exit code.
///
/// # Errors
///
/// Returns wrapper-level failures (discovery, unknown command, flag
/// conflicts, spawn errors). A backend that runs and fails is an exit code,
/// not an error.
pub fn run_cli(app: &App, args: &[String]) -> Result<i32> {
    if input::version_requested(args) {
        return handlers::handle_version(app);
    }

    let focus = input::first_argument(args);
    if let Some(name) = focus {
        if !app.knows(name)? {
            return Err(passthru_core::Error::CommandNotFound(name.to_string()).into());
        }
    }

    let matches = match build_cli(app, focus)?.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            e.print()?;
            return Ok(e.exit_code());
        }
    };

    match matches.subcommand() {
        None | Some((LIST_COMMANDS, _)) => handlers::handle_list(app),
        Some((HELP, sub_m)) => handlers::handle_help(app, sub_m),
        Some((COMPLETION, sub_m)) => handlers::handle_completion(app, sub_m),
        Some((name, sub_m)) => match app.shortcut(name) {
            Some(shortcut) => handlers::handle_shortcut(app, shortcut, sub_m),
            None => handlers::handle_pass_through(app, name, sub_m),
        },
    }
}
