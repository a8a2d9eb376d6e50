//! The set of commands the backend offers
//!
//! Listing runs once per process. Each entry is a [`CommandDefinition`]
//! handle whose full schema is built only when that command is used.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    definition::{CommandDefinition, SynthesisContext},
    introspection::CommandSummary,
    Error, Result,
};

type Commands = BTreeMap<String, Arc<CommandDefinition>>;

#[derive(Debug)]
pub struct CommandCatalog {
    context: Arc<SynthesisContext>,
    commands: Mutex<Option<Arc<Commands>>>,
}

impl CommandCatalog {
    #[must_use]
    pub const fn new(context: Arc<SynthesisContext>) -> Self {
        Self {
            context,
            commands: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &Arc<SynthesisContext> {
        &self.context
    }

    /// Load the listing on first use; later calls share the cached map.
    fn commands(&self) -> Result<Arc<Commands>> {
        let mut slot = self.commands.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(commands) = slot.as_ref() {
            return Ok(Arc::clone(commands));
        }

        let commands: Commands = self
            .context
            .introspector
            .list_commands()?
            .into_iter()
            .map(|summary| {
                let name = summary.name.clone();
                let definition = CommandDefinition::new(summary, Arc::clone(&self.context));
                (name, Arc::new(definition))
            })
            .collect();

        let commands = Arc::new(commands);
        *slot = Some(Arc::clone(&commands));
        Ok(commands)
    }

    /// Every command name, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] when the backend's listing cannot be read.
    pub fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.commands()?.keys().cloned().collect())
    }

    pub fn summaries(&self) -> Result<Vec<CommandSummary>> {
        Ok(self
            .commands()?
            .values()
            .map(|definition| definition.summary().clone())
            .collect())
    }

    pub fn has(&self, name: &str) -> Result<bool> {
        Ok(self.commands()?.contains_key(name))
    }

    /// Look a command up by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandNotFound`] for unknown names, or the listing
    /// error if the catalog could not be loaded.
    pub fn resolve(&self, name: &str) -> Result<Arc<CommandDefinition>> {
        self.commands()?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CommandNotFound(name.to_string()))
    }

    /// Whether the listing has been loaded yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
