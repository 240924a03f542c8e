//! `minutes` command-line entry point.
//!
//! Every run behaves like one page load: rehydrate the selection, apply the
//! requested action, flush, print, exit.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use minutes_core::{init_logging, MinutesConfig};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.apply_overrides(MinutesConfig::from_env());

    // Logging is best effort; the tool still works without a log file.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match commands::run(cli.command, &config, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
