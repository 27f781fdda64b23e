#![doc(html_root_url = "https://docs.rs/framecat/latest")]
//! Public API for the `framecat` library.
//!
//! This crate bridges a process's standard streams and a message socket:
//! standard input is read to completion and sent as one message, and one
//! received multipart message is written to standard output frame by frame.
//! The pattern chosen decides which of the two happen, and in what order.

pub mod assembler;
pub mod bridge;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod pattern;
pub mod relay;
mod test_helpers;

pub use assembler::{AssembleError, Assembled, Assembler, DEFAULT_CHUNK_CAPACITY};
pub use bridge::{Summary, exchange, run};
pub use config::BridgeConfig;
pub use endpoint::{Endpoint, TransportError, ZmqEndpoint, connect_or_bind};
pub use error::{BridgeError, FAILURE_EXIT_CODE, Result, USAGE_EXIT_CODE};
pub use pattern::{Pattern, Step, UnknownPattern};
pub use relay::{RelayError, RelayStats, relay};
