use std::io::{self, Write};

use anyhow::{anyhow, Result};
use clap::Command;
use clap_complete::{env::Shells, CompleteEnv, Shell};

use crate::cli::input::COMPLETE_ENV;

/// Answer a completion request if the shell made one.
///
/// Returns `Ok(true)` when the process was invoked for completion and the
/// candidates have been written.
pub fn try_handle_completion(factory: impl Fn() -> Command) -> clap::error::Result<bool> {
    CompleteEnv::with_factory(factory)
        .var(COMPLETE_ENV)
        .try_complete(std::env::args_os(), std::env::current_dir().ok().as_deref())
}

/// Print the script that registers dynamic completion with `shell`.
pub fn write_registration(shell: Shell, factory: impl Fn() -> Command) -> Result<()> {
    let mut cmd = factory();
    cmd.build();

    let shell_name = match shell {
        Shell::Bash => "bash",
        Shell::Zsh => "zsh",
        Shell::Fish => "fish",
        Shell::Elvish => "elvish",
        Shell::PowerShell => "powershell",
        other => return Err(anyhow!("unsupported shell {other:?}")),
    };

    let shells = Shells::builtins();
    let completer = shells
        .completer(shell_name)
        .ok_or_else(|| anyhow!("unsupported shell {shell_name}"))?;

    let bin = cmd
        .get_bin_name()
        .unwrap_or_else(|| cmd.get_name())
        .to_string();
    let completer_path = std::env::args().next().unwrap_or_else(|| bin.clone());

    let mut buf = Vec::new();
    completer
        .write_registration(COMPLETE_ENV, cmd.get_name(), &bin, &completer_path, &mut buf)
        .map_err(|e| anyhow!("Failed to write completion script: {e}"))?;
    io::stdout().write_all(&buf)?;
    Ok(())
}
