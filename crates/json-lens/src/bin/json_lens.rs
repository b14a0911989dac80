//! `json-lens`: evaluate a path against a JSON document read from stdin.
//!
//! Usage:
//!   json-lens '<path>' [--lines]
//!   json-lens --valid
//!
//! Exits with status 1 when the path matches nothing or the input is not
//! valid. Log verbosity is read from `JSON_LENS_LOG` (default `warn`).

use std::io::{self, Write};
use std::process::ExitCode;

use json_lens::cli::{self, CliError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_env("JSON_LENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let input = match cli::read_input(io::stdin().lock()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&command, &input) {
        Ok(out) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{out}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(CliError::NotFound) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
