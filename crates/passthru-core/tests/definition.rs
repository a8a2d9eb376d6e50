//! Lazy command synthesis against a stub backend

mod common;

use std::sync::Arc;

use common::{context, structured_backend, StubBackend};
use passthru_core::{CapturedOutput, CommandCatalog, Error, IntrospectionMode};

#[test]
fn schema_is_synthesized_from_structured_help() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let schema = catalog.resolve("start")?.ensure_initialized()?;
    assert_eq!(schema.description, "Start a project");
    assert_eq!(
        schema.help_text,
        "Start one or more projects.\n\nExamples:\nwrap start\nwrap start --all"
    );
    assert_eq!(schema.aliases, vec!["add".to_string()]);
    assert_eq!(schema.usage_lines, vec!["[projectname ...] [flags]".to_string()]);

    let flags: Vec<&str> = schema.flags.iter().map(|f| f.long_name.as_str()).collect();
    assert_eq!(flags, vec!["all", "select-services"]);
    assert_eq!(schema.positional.name, "arguments");
    Ok(())
}

#[test]
fn ensure_initialized_queries_backend_once() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));
    let start = catalog.resolve("start")?;

    let first = start.ensure_initialized()?;
    let second = start.ensure_initialized()?;
    let _ = start.help_text()?;
    let _ = start.aliases()?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(backend.count(&["help", "start"]), 1);
    Ok(())
}

#[test]
fn concurrent_initialization_queries_backend_once() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));
    let start = catalog.resolve("start")?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| start.ensure_initialized().map(|schema| schema.flags.len())))
            .collect();
        for handle in handles {
            assert!(matches!(handle.join(), Ok(Ok(2))));
        }
    });

    assert_eq!(backend.count(&["help", "start"]), 1);
    Ok(())
}

#[test]
fn reserved_flag_conflict_is_fatal() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend().respond_json(
        &["help", "stop"],
        &serde_json::json!({
            "LongDescription": "Stop",
            "Flags": [{"Name": "verbose", "Shorthand": "", "Usage": "Chatty"}]
        }),
    ));
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));
    let stop = catalog.resolve("stop")?;

    let result = stop.ensure_initialized();
    assert!(matches!(
        result,
        Err(Error::FlagConflict { ref flag, ref command }) if flag == "verbose" && command == "stop"
    ));
    assert!(!stop.is_initialized());
    Ok(())
}

#[test]
fn json_output_shorthand_clash_is_fatal() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend().respond_json(
        &["help", "stop"],
        &serde_json::json!({
            "LongDescription": "Stop",
            "Flags": [{"Name": "jobs", "Shorthand": "j", "Usage": "Parallel jobs"}]
        }),
    ));
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));
    let stop = catalog.resolve("stop")?;

    let result = stop.ensure_initialized();
    assert!(matches!(
        result,
        Err(Error::FlagConflict { ref flag, ref command }) if flag == "jobs" && command == "stop"
    ));
    assert!(!stop.is_initialized());
    Ok(())
}

#[test]
fn missing_per_command_help_degrades_to_empty_schema() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend());
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let schema = catalog.resolve("launch")?.ensure_initialized()?;
    assert_eq!(schema.help_text, "");
    assert!(schema.aliases.is_empty());
    assert!(schema.usage_lines.is_empty());
    assert!(schema.flags.is_empty());
    Ok(())
}

#[test]
fn completion_forwards_to_backend_and_drops_directives() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend().respond(
        &["__complete", "start", "my"],
        CapturedOutput::success("mysite\nmyshop\n:4\n"),
    ));
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let candidates = catalog.resolve("start")?.complete("my")?;
    assert_eq!(candidates, vec!["mysite".to_string(), "myshop".to_string()]);
    assert!(!catalog.resolve("start")?.is_initialized());
    Ok(())
}

#[test]
fn raw_help_rewrites_backend_invocation() -> passthru_core::Result<()> {
    let backend = Arc::new(structured_backend().respond(
        &["start", "-h", "--all"],
        CapturedOutput::success("Usage:\n  tool start [flags]\n"),
    ));
    let catalog = CommandCatalog::new(context(&backend, IntrospectionMode::Structured));

    let help = catalog.resolve("start")?.raw_help(&["--all".to_string()])?;
    assert_eq!(help, "Usage:\n  wrap start [flags]\n");
    Ok(())
}

#[test]
fn backend_version_reports_unknown_on_failure() -> passthru_core::Result<()> {
    let backend = Arc::new(StubBackend::new("tool"));
    let context = context(&backend, IntrospectionMode::Auto);
    assert_eq!(context.introspector.backend_version()?, "UNKNOWN");

    let backend = Arc::new(
        StubBackend::new("tool").respond(&["-v"], CapturedOutput::success("tool version v1.2.3\n")),
    );
    let context = common::context(&backend, IntrospectionMode::Auto);
    assert_eq!(context.introspector.backend_version()?, "tool version v1.2.3");
    Ok(())
}
