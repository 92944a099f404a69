//! Chopher CLI - turn bytes into plucked-string songs
//!
//! Renders a file or a seeded synthetic corpus to WAV, or serves an upload
//! page that does the same for posted files.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use chopher_cli::cli_args::{normalize_args, Cli, Mode};
use chopher_cli::commands;
use chopher_cli::config::Settings;
use chopher_cli::server;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let result = match cli.mode() {
        Mode::File(path) => commands::file::run(&path, &Settings::default()),
        Mode::Seed { seed, corpus, size } => {
            commands::seed::run(seed, corpus, size, Path::new("."), &Settings::default())
        }
        Mode::Serve => Settings::from_env(cli.static_dir).and_then(server::run),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
