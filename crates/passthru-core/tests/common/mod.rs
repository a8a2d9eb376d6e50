//! Common test utilities for passthru-core integration tests
//!
//! [`StubBackend`] answers backend calls from a table of canned outputs and
//! records every call it receives.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    dead_code
)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use passthru_core::{
    definition::SynthesisContext, Backend, CapturedOutput, IntrospectionMode, Introspector,
    ReservedOptions, Result,
};

#[derive(Debug, Default)]
pub struct StubBackend {
    program: String,
    responses: Mutex<HashMap<Vec<String>, CapturedOutput>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StubBackend {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            ..Self::default()
        }
    }

    /// Answer `<program> <argv...>` with `output`.
    pub fn respond(self, argv: &[&str], output: CapturedOutput) -> Self {
        let key = argv.iter().map(ToString::to_string).collect();
        self.responses.lock().unwrap().insert(key, output);
        self
    }

    /// Answer `<program> <argv...> --json-output` with `{"raw": <raw>}`.
    pub fn respond_json(self, argv: &[&str], raw: &serde_json::Value) -> Self {
        let mut argv = argv.to_vec();
        argv.push("--json-output");
        let document = serde_json::json!({ "level": "info", "msg": "", "raw": raw });
        self.respond(&argv, CapturedOutput::success(document.to_string()))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose argv starts with `prefix`.
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b)
            })
            .count()
    }

    fn answer(&self, command: &str, args: &[String]) -> CapturedOutput {
        let mut argv = vec![command.to_string()];
        argv.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(argv.clone());

        self.responses
            .lock()
            .unwrap()
            .get(&argv)
            .cloned()
            .unwrap_or_else(|| CapturedOutput::failure(format!("unknown command \"{command}\"")))
    }
}

impl Backend for StubBackend {
    fn program(&self) -> &str {
        &self.program
    }

    fn run_captured(
        &self,
        command: &str,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> Result<CapturedOutput> {
        Ok(self.answer(command, args))
    }

    fn run_interactive(&self, command: &str, args: &[String]) -> Result<bool> {
        Ok(self.answer(command, args).succeeded)
    }
}

pub fn host_reserved() -> ReservedOptions {
    ReservedOptions::new()
        .with("help", Some('h'))
        .with("verbose", Some('v'))
        .with("capture", None)
}

pub fn context(backend: &Arc<StubBackend>, mode: IntrospectionMode) -> Arc<SynthesisContext> {
    let backend: Arc<dyn Backend> = backend.clone();
    Arc::new(SynthesisContext::new(
        Arc::new(Introspector::new(backend, mode)),
        Arc::new(host_reserved()),
        "wrap",
    ))
}

/// Structured listing with `start`, `stop` and `launch`.
pub fn command_list() -> serde_json::Value {
    serde_json::json!({
        "Commands": [
            {"Name": "start", "Description": "Start a project"},
            {"Name": "stop", "Description": "Stop a project"}
        ],
        "AdditionalHelpCommands": null,
        "AdditionalCommands": [
            {"Name": "launch", "Description": "Launch a browser"}
        ]
    })
}

pub fn start_help() -> serde_json::Value {
    serde_json::json!({
        "LongDescription": "Start one or more projects.",
        "Example": "tool start\ntool start --all",
        "Aliases": ["start", "add"],
        "Usage": "tool start [projectname ...] [flags]",
        "Flags": [
            {"Name": "all", "Shorthand": "a", "Usage": "Start all projects"},
            {"Name": "help", "Shorthand": "h", "Usage": "help for start"},
            {"Name": "select-services", "Shorthand": "", "Usage": "Start only these services"}
        ]
    })
}

pub fn structured_backend() -> StubBackend {
    StubBackend::new("tool")
        .respond_json(&["help"], &command_list())
        .respond_json(&["help", "start"], &start_help())
}
