//! passthru - run a backend tool's commands through a generated CLI
//!
//! Binary name: `passthru`

use std::process;

use anyhow::{Context, Result};
use passthru::{
    cli::{base_cli, build_cli, handlers::format_error, input, setup::init_tracing},
    completions, run_cli, App,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if let Err(err) = init_tracing(input::verbosity(&args)) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Warning: {err}");
        }
    }

    match run(&args) {
        Ok(code) => {
            #[allow(clippy::exit)]
            process::exit(code);
        }
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {}", format_error(&err));
            }

            let code = err
                .downcast_ref::<passthru_core::Error>()
                .map(passthru_core::Error::exit_code)
                .unwrap_or(1);

            #[allow(clippy::exit)]
            process::exit(code);
        }
    }
}

fn run(args: &[String]) -> Result<i32> {
    let config = passthru_core::load_config().context("Failed to load configuration")?;
    let app = App::new(config)?;

    if std::env::var_os(input::COMPLETE_ENV).is_some() {
        let focus = input::completion_focus(args);
        let handled = completions::try_handle_completion(|| {
            build_cli(&app, focus).unwrap_or_else(|_| base_cli(&app))
        })?;
        if handled {
            return Ok(0);
        }
    }

    run_cli(&app, args)
}
