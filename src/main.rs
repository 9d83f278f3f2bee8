use std::env;

use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; filter from `TASKBOARD_LOG`, JSON lines when
/// `TASKBOARD_LOG_FORMAT=json`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TASKBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("taskboard=warn"));

    let registry = tracing_subscriber::registry().with(filter);

    match env::var("TASKBOARD_LOG_FORMAT").as_deref() {
        Ok("json") => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
