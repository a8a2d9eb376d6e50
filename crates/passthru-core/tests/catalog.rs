//! Command catalog discovery against a stub backend

mod common;

use std::sync::Arc;

use common::{context, structured_backend, StubBackend};
use passthru_core::{CapturedOutput, CommandCatalog, CommandSummary, Error, IntrospectionMode};

const TEXT_HELP: &str = "\
Manage local projects.

Usage:
  tool [command]

Available Commands:
  start       Start a project
  stop        Stop a project

Flags:
  -h, --help   help for tool
";

#[test]
fn structured_listing_resolves_every_name() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let names = catalog.list_names()?;
    assert_eq!(names, vec!["launch", "start", "stop"]);

    for name in &names {
        assert!(catalog.has(name)?);
        assert_eq!(catalog.resolve(name)?.name(), name);
    }
    Ok(())
}

#[test]
fn listing_runs_once_and_defers_definitions() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    assert!(!catalog.is_loaded());
    let _ = catalog.list_names()?;
    let _ = catalog.summaries()?;
    let start = catalog.resolve("start")?;

    assert!(catalog.is_loaded());
    assert!(!start.is_initialized());
    assert_eq!(backend.calls(), vec![vec!["help".to_string(), "--json-output".to_string()]]);
    Ok(())
}

#[test]
fn unknown_command_is_not_found() {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    assert!(matches!(catalog.has("nope"), Ok(false)));
    let result = catalog.resolve("nope");
    assert!(matches!(result, Err(Error::CommandNotFound(ref name)) if name == "nope"));
}

#[test]
fn summaries_keep_descriptions() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let summaries = catalog.summaries()?;
    assert!(summaries.contains(&CommandSummary::new("launch", "Launch a browser")));
    Ok(())
}

#[test]
fn structured_mode_without_document_is_discovery_error() {
    let backend = Arc::new(
        StubBackend::new("tool").respond(&["help", "--json-output"], CapturedOutput::success(TEXT_HELP)),
    );
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let result = catalog.list_names();
    assert!(matches!(result, Err(Error::Discovery(ref msg)) if msg.contains("tool help")));
}

#[test]
fn text_listing_without_section_is_discovery_error() {
    let backend = Arc::new(
        StubBackend::new("tool").respond(&["help"], CapturedOutput::success("Usage:\n  tool [command]\n")),
    );
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Text));

    assert!(matches!(catalog.list_names(), Err(Error::Discovery(_))));
    assert!(!catalog.is_loaded());
}

#[test]
fn text_listing_parses_available_commands() -> passthru_core::Result<()> {
    let backend =
        Arc::new(StubBackend::new("tool").respond(&["help"], CapturedOutput::success(TEXT_HELP)));
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Text));

    assert_eq!(catalog.list_names()?, vec!["start", "stop"]);
    assert_eq!(backend.count(&["help", "--json-output"]), 0);
    Ok(())
}

#[test]
fn auto_mode_falls_back_to_text() -> passthru_core::Result<()> {
    let backend = Arc::new(
        StubBackend::new("tool")
            .respond(&["help", "--json-output"], CapturedOutput::success(TEXT_HELP))
            .respond(&["help"], CapturedOutput::success(TEXT_HELP))
            .respond(
                &["stop", "-h"],
                CapturedOutput::success("Stop a project.\n\nAliases:\n  stop, halt\n"),
            ),
    );
    let context = context(&backend, IntrospectionMode::Auto);
    let catalog = CommandCatalog::new(Arc::clone(&context));

    assert_eq!(catalog.list_names()?, vec!["start", "stop"]);
    assert_eq!(context.introspector.active_mode(), IntrospectionMode::Text);

    let stop = catalog.resolve("stop")?;
    assert_eq!(stop.aliases()?, vec!["halt".to_string()]);
    assert_eq!(backend.count(&["help", "stop"]), 0);
    Ok(())
}

#[test]
fn auto_mode_prefers_structured() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let context = context(&backend, IntrospectionMode::Auto);
    let catalog = CommandCatalog::new(Arc::clone(&context));

    assert_eq!(catalog.list_names()?.len(), 3);
    assert_eq!(context.introspector.active_mode(), IntrospectionMode::Structured);
    assert_eq!(backend.count(&["help"]), 1);
    Ok(())
}
