//! Canonical error type for a bridge run and its process exit codes.
//!
//! Every failure is terminal: nothing is retried, the error is reported on
//! the diagnostic stream and the process exits with [`FAILURE_EXIT_CODE`].
//! Usage errors are caught before any transport activity and exit with
//! [`USAGE_EXIT_CODE`].

use thiserror::Error;

use crate::{assembler::AssembleError, endpoint::TransportError, relay::RelayError};

/// Exit status for invalid or missing command-line arguments.
pub const USAGE_EXIT_CODE: u8 = 254;

/// Exit status for any transport or transfer failure.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Top-level error raised by [`crate::bridge`].
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Opening, binding or connecting the endpoint failed.
    #[error(transparent)]
    Setup(TransportError),
    /// Standard input could not be turned into a payload.
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    /// The assembled payload could not be sent.
    #[error(transparent)]
    Send(TransportError),
    /// Receiving or writing a message failed.
    #[error(transparent)]
    Relay(#[from] RelayError),
    /// Closing the endpoint failed.
    #[error(transparent)]
    Teardown(TransportError),
}

impl BridgeError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Setup(_)
            | Self::Assemble(_)
            | Self::Send(_)
            | Self::Relay(_)
            | Self::Teardown(_) => FAILURE_EXIT_CODE,
        }
    }
}

/// Result alias used by bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
