//! Command line interface for the `framecat` binary.
//!
//! Kept free of crate imports so `build.rs` can include it to render the
//! manual page.

use std::num::NonZeroUsize;

use clap::{Parser, builder::PossibleValuesParser};

/// Pattern names accepted by `--type`.
pub const PATTERN_NAMES: [&str; 6] = ["push", "pull", "req", "rep", "pub", "sub"];

/// Command line arguments for the `framecat` binary.
#[derive(Debug, Parser)]
#[command(
    name = "framecat",
    version,
    about = "Send standard input as a message, or write a received message to standard output"
)]
pub struct Cli {
    /// Messaging pattern: push, pull, req, rep, pub or sub.
    #[arg(
        short = 't',
        long = "type",
        default_value = "push",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(PATTERN_NAMES)
    )]
    pub pattern: String,

    /// Endpoint address, for example "tcp://127.0.0.1:5000".
    #[arg(short, long)]
    pub endpoint: String,

    /// Bind instead of connect.
    #[arg(short, long)]
    pub bind: bool,

    /// Report connection and per-message byte counts on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subscription prefix for the sub pattern (default: every message).
    #[arg(short, long, default_value_t)]
    pub subscribe: String,

    /// Refuse to send inputs larger than this many bytes.
    #[arg(long = "max-size", value_name = "BYTES")]
    pub max_size: Option<NonZeroUsize>,
}
