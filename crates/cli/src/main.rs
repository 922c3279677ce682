//! hellotable CLI: walk through a managed wide-column store's client API.
//!
//! ```text
//! hellotable --project my-project --instance my-instance
//! hellotable --project p --instance i --backend memory --json
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`).

mod commands;
mod format;
mod parse;

use std::process;

use hellotable::Walkthrough;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_report};
use parse::matches_to_config;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() {
    init_logging();
    let matches = build_cli().get_matches();

    let config = match matches_to_config(&matches, |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    let walkthrough = match Walkthrough::connect(&config.options, config.schema) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    };

    match walkthrough.run() {
        Ok(report) => match format_report(&report, config.output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{}", format_error(&e));
                process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    }
}
