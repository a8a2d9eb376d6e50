//! Test harness for driving the passthru binary against a scripted backend
//!
//! Each [`Harness`] owns a temporary directory holding a shell-script
//! backend named `tool` and a config file. Commands run with that directory
//! as their working directory, so no user or project config leaks in.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    dead_code
)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use tempfile::TempDir;

/// Name the wrapper runs under in every test.
pub const WRAPPER: &str = "wrap";

const BACKEND_SCRIPT: &str = r#"#!/bin/sh
if [ "$2" = "-h" ]; then
  case "$1" in
    start)
      cat <<'HELP'
Start one or more projects.

Usage:
  tool start [projectname ...] [flags]

Aliases:
  start, add

Examples:
  tool start
  tool start --all

Flags:
  -a, --all             Start all projects
  -h, --help            help for start
  -s, --select string   Select services to start
HELP
      ;;
    clash)
      cat <<'HELP'
Usage:
  tool clash [flags]

Flags:
      --capture   Capture something else entirely
HELP
      ;;
    *)
      printf 'Usage:\n  tool %s [flags]\n' "$1"
      ;;
  esac
  exit 0
fi

case "$1" in
  -v)
    echo "v1.2.3"
    ;;
  help)
    cat <<'HELP'
Tool manages local development environments.

Usage:
  tool [command]

Available Commands:
  clash       Declares a flag the wrapper owns
  fail        Always fails
  help        Help about any command
  start       Start a project
  stop        Stop a project

Flags:
  -h, --help   help for tool
HELP
    ;;
  start)
    shift
    echo "start $*"
    ;;
  stop)
    echo "Stopped."
    ;;
  fail)
    echo "fail: it broke" >&2
    exit 1
    ;;
  __complete)
    echo "web"
    echo "db"
    echo ":4"
    ;;
  *)
    echo "Error: unknown command \"$1\" for \"tool\"" >&2
    exit 1
    ;;
esac
"#;

pub struct Harness {
    dir: TempDir,
    backend: PathBuf,
    config: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// A harness whose global config file holds `toml`.
    pub fn with_config(toml: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");

        let backend = dir.path().join("tool");
        fs::write(&backend, BACKEND_SCRIPT).expect("write backend script");
        fs::set_permissions(&backend, fs::Permissions::from_mode(0o755))
            .expect("make backend executable");

        let config = dir.path().join("config.toml");
        fs::write(&config, toml).expect("write config");

        Self {
            dir,
            backend,
            config,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The wrapper, pointed at the scripted backend with captured output.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_passthru"));
        cmd.current_dir(self.dir.path())
            .env("PASSTHRU_BACKEND", &self.backend)
            .env("PASSTHRU_CONFIG", &self.config)
            .env("PASSTHRU_NAME", WRAPPER)
            .env("PASSTHRU_INTROSPECTION", "text")
            .env("PASSTHRU_INTERACTIVE", "never")
            .env_remove("RUST_LOG")
            .env_remove("COMPLETE");
        cmd
    }
}
