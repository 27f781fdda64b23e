//! Errors raised while buffering standard input into a payload.

use std::{io, num::NonZeroUsize};

use thiserror::Error;

/// Failure to produce an outbound payload.
///
/// Every variant is raised after the buffered chunks have been released.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Reading the input stream failed.
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
    /// The input grew beyond the configured payload cap.
    #[error("input exceeds size limit: at least {attempted} bytes > {limit} bytes")]
    TooLarge {
        /// Bytes buffered when the cap was crossed.
        attempted: usize,
        /// Configured cap.
        limit: NonZeroUsize,
    },
    /// The contiguous payload buffer could not be allocated.
    #[error("failed to allocate a {requested} byte payload")]
    Allocation {
        /// Exact payload size that was requested.
        requested: usize,
    },
}
