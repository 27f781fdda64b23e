//! Transport endpoint capability consumed by the bridge.
//!
//! The assembler and relay only need to send one message, receive one frame
//! and ask whether more frames of the current message follow. [`Endpoint`]
//! captures exactly that, so the core can be driven by the ZeroMQ adapter in
//! [`zmq`] or by an in-memory endpoint in tests.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod zmq;

pub use self::zmq::{ZmqEndpoint, connect_or_bind};

/// Errors reported by a transport endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Creating, binding or connecting the socket failed.
    #[error("failed to open endpoint {endpoint}: {source}")]
    Setup {
        /// Address that was being bound or connected.
        endpoint: String,
        /// Underlying transport failure.
        #[source]
        source: zeromq::ZmqError,
    },
    /// A send call failed.
    #[error("send failed: {0}")]
    Send(#[source] zeromq::ZmqError),
    /// A receive call failed.
    #[error("receive failed: {0}")]
    Receive(#[source] zeromq::ZmqError),
    /// The socket kind cannot perform the requested operation.
    #[error("{pattern} sockets cannot {operation}")]
    Unsupported {
        /// Pattern of the socket.
        pattern: crate::pattern::Pattern,
        /// Operation that was attempted.
        operation: &'static str,
    },
    /// Tearing the socket down reported one or more failures.
    #[error("failed to close endpoint: {0}")]
    Close(String),
    /// Failure raised by a non-ZeroMQ endpoint.
    #[error("{0}")]
    Other(String),
}

/// A connected or bound message endpoint.
#[async_trait]
pub trait Endpoint: Send {
    /// Send `payload` as one logical message.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the transport rejects the message.
    async fn send(&mut self, payload: Bytes) -> Result<(), TransportError>;

    /// Receive the next frame of the current (or next) logical message.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the receive fails.
    async fn receive_frame(&mut self) -> Result<Bytes, TransportError>;

    /// Whether more frames of the most recently received message remain.
    fn more_frames_follow(&self) -> bool;

    /// Release the endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if teardown reports failures.
    async fn close(self) -> Result<(), TransportError>
    where
        Self: Sized;
}
