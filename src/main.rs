//! `framecat` binary: bridge standard input and output through a socket.
//!
//! Parses CLI arguments, installs the diagnostic subscriber on stderr and
//! runs one exchange.

mod cli;

use std::{io::IsTerminal, process::ExitCode};

use clap::{Parser, error::ErrorKind};
use framecat::{BridgeConfig, Pattern, USAGE_EXIT_CODE, bridge};
use tracing::{Level, error};

fn usage_error(message: &impl std::fmt::Display) -> ExitCode {
    eprintln!("{message}");
    ExitCode::from(USAGE_EXIT_CODE)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return usage_error(&err.render()),
    };

    // Diagnostics go to stderr only; stdout carries payload bytes.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_max_level(if cli.verbose { Level::INFO } else { Level::WARN })
        .with_target(false)
        .without_time()
        .init();

    let pattern = match cli.pattern.parse::<Pattern>() {
        Ok(pattern) => pattern,
        Err(err) => return usage_error(&err),
    };
    let config = BridgeConfig::new(pattern, cli.endpoint)
        .with_bind(cli.bind)
        .with_subscription(cli.subscribe)
        .with_max_payload_size(cli.max_size);

    match bridge::run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
