//! Relay of one received multipart message to an output stream.
//!
//! Frames are written in arrival order with nothing between them, so the
//! output is the byte-for-byte concatenation of the message's frames. Each
//! frame is flushed before the next receive, so a failed receive leaves
//! everything relayed so far intact in the sink.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

use crate::endpoint::{Endpoint, TransportError};

/// Failure while relaying a message.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Receiving a frame failed.
    #[error(transparent)]
    Receive(#[from] TransportError),
    /// Writing a frame to the output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Counters describing a relayed message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Frames received.
    pub frames: usize,
    /// Total payload bytes written.
    pub bytes: usize,
}

/// Receive one logical message from `endpoint` and write it to `sink`.
///
/// At least one frame is always received; the loop ends once the endpoint
/// reports that no more frames of the message follow.
///
/// # Errors
///
/// Returns [`RelayError::Receive`] as soon as any frame receive fails and
/// [`RelayError::Write`] if the sink rejects a frame. No further frames are
/// received after an error.
pub async fn relay<E, W>(endpoint: &mut E, sink: &mut W) -> Result<RelayStats, RelayError>
where
    E: Endpoint,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut stats = RelayStats::default();
    loop {
        let frame = endpoint.receive_frame().await?;
        let more = endpoint.more_frames_follow();

        info!(frame = stats.frames, "receiving {} bytes", frame.len());
        sink.write_all(&frame).await.map_err(RelayError::Write)?;
        sink.flush().await.map_err(RelayError::Write)?;

        stats.frames += 1;
        stats.bytes += frame.len();
        if !more {
            return Ok(stats);
        }
    }
}
