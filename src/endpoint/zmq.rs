//! ZeroMQ-backed [`Endpoint`].
//!
//! The `zeromq` sockets hand back a whole multipart message per receive. The
//! adapter queues its frames and serves them one at a time, reporting that
//! more frames follow while any remain queued.

use std::{collections::VecDeque, fmt};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, channel::mpsc::Receiver};
use tracing::debug;
use zeromq::{
    PubSocket,
    PullSocket,
    PushSocket,
    RepSocket,
    ReqSocket,
    Socket,
    SocketRecv,
    SocketEvent,
    SocketSend,
    SubSocket,
    ZmqMessage,
    ZmqResult,
};

use super::{Endpoint, TransportError};
use crate::pattern::Pattern;

enum Kind {
    Push(PushSocket),
    Pull(PullSocket),
    Req(ReqSocket),
    Rep(RepSocket),
    Pub(PubSocket),
    Sub(SubSocket),
}

/// A ZeroMQ socket of the kind selected by a [`Pattern`].
pub struct ZmqEndpoint {
    pattern: Pattern,
    address: String,
    socket: Kind,
    pending: VecDeque<Bytes>,
    /// Monitor of a bound socket that sends first, held until a peer attaches.
    peer_events: Option<Receiver<SocketEvent>>,
}

/// Open a socket for `pattern` and bind it to, or connect it to, `endpoint`.
///
/// Subscriber sockets subscribe to `subscription` before returning; the empty
/// prefix matches every message. A bound PUSH or REQ socket has no peer yet,
/// so its first send waits until one is accepted.
///
/// # Errors
///
/// Returns [`TransportError::Setup`] if the address is invalid or the bind,
/// connect or subscribe call fails.
pub async fn connect_or_bind(
    pattern: Pattern,
    endpoint: &str,
    bind: bool,
    subscription: &str,
) -> Result<ZmqEndpoint, TransportError> {
    let setup = |source| TransportError::Setup {
        endpoint: endpoint.to_owned(),
        source,
    };
    let watch = bind && matches!(pattern, Pattern::Push | Pattern::Req);
    let (socket, address, peer_events) = match pattern {
        Pattern::Push => attach(PushSocket::new(), endpoint, bind, watch)
            .await
            .map(|(s, a, e)| (Kind::Push(s), a, e)),
        Pattern::Pull => attach(PullSocket::new(), endpoint, bind, watch)
            .await
            .map(|(s, a, e)| (Kind::Pull(s), a, e)),
        Pattern::Req => attach(ReqSocket::new(), endpoint, bind, watch)
            .await
            .map(|(s, a, e)| (Kind::Req(s), a, e)),
        Pattern::Rep => attach(RepSocket::new(), endpoint, bind, watch)
            .await
            .map(|(s, a, e)| (Kind::Rep(s), a, e)),
        Pattern::Pub => attach(PubSocket::new(), endpoint, bind, watch)
            .await
            .map(|(s, a, e)| (Kind::Pub(s), a, e)),
        Pattern::Sub => {
            let mut socket = SubSocket::new();
            socket.subscribe(subscription).await.map_err(setup)?;
            debug!(subscription, "subscribed");
            attach(socket, endpoint, bind, watch)
                .await
                .map(|(s, a, e)| (Kind::Sub(s), a, e))
        }
    }
    .map_err(setup)?;

    Ok(ZmqEndpoint {
        pattern,
        address,
        socket,
        pending: VecDeque::new(),
        peer_events,
    })
}

type Attached<S> = (S, String, Option<Receiver<SocketEvent>>);

/// Bind or connect, returning the socket and the resolved address.
///
/// With `watch` set the socket monitor is installed before binding so no
/// accepted peer is missed.
async fn attach<S: Socket>(
    mut socket: S,
    endpoint: &str,
    bind: bool,
    watch: bool,
) -> ZmqResult<Attached<S>> {
    let events = watch.then(|| socket.monitor());
    let address = if bind {
        socket.bind(endpoint).await?.to_string()
    } else {
        socket.connect(endpoint).await?;
        endpoint.to_owned()
    };
    Ok((socket, address, events))
}

/// Wait until the bound socket has accepted a peer.
async fn await_peer(events: &mut Receiver<SocketEvent>) -> Result<(), TransportError> {
    while let Some(event) = events.next().await {
        if let SocketEvent::Accepted(endpoint, _) = event {
            debug!(%endpoint, "peer attached");
            return Ok(());
        }
    }
    Err(TransportError::Other(
        "socket closed before a peer attached".to_owned(),
    ))
}

impl ZmqEndpoint {
    /// Pattern this socket was opened for.
    #[must_use]
    pub const fn pattern(&self) -> Pattern { self.pattern }

    /// Address the socket is attached to.
    ///
    /// For bound sockets this is the resolved address, so binding to port `0`
    /// reports the port that was actually assigned.
    #[must_use]
    pub fn address(&self) -> &str { &self.address }
}

impl fmt::Debug for ZmqEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZmqEndpoint")
            .field("pattern", &self.pattern)
            .field("address", &self.address)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn unsupported(pattern: Pattern, operation: &'static str) -> TransportError {
    TransportError::Unsupported { pattern, operation }
}

#[async_trait]
impl Endpoint for ZmqEndpoint {
    async fn send(&mut self, payload: Bytes) -> Result<(), TransportError> {
        let pattern = self.pattern;
        if let Some(mut events) = self.peer_events.take() {
            debug!(address = %self.address, "waiting for a peer");
            await_peer(&mut events).await?;
        }
        let message = ZmqMessage::from(payload);
        let sent = match &mut self.socket {
            Kind::Push(s) => s.send(message).await,
            Kind::Req(s) => s.send(message).await,
            Kind::Rep(s) => s.send(message).await,
            Kind::Pub(s) => s.send(message).await,
            Kind::Pull(_) | Kind::Sub(_) => return Err(unsupported(pattern, "send")),
        };
        sent.map_err(TransportError::Send)
    }

    async fn receive_frame(&mut self) -> Result<Bytes, TransportError> {
        if self.pending.is_empty() {
            let pattern = self.pattern;
            let received = match &mut self.socket {
                Kind::Pull(s) => s.recv().await,
                Kind::Req(s) => s.recv().await,
                Kind::Rep(s) => s.recv().await,
                Kind::Sub(s) => s.recv().await,
                Kind::Push(_) | Kind::Pub(_) => return Err(unsupported(pattern, "receive")),
            };
            let message = received.map_err(TransportError::Receive)?;
            debug!(frames = message.len(), "received message");
            self.pending.extend(message.into_vec());
        }
        // zeromq never yields a message without frames; treat one as empty.
        Ok(self.pending.pop_front().unwrap_or_default())
    }

    fn more_frames_follow(&self) -> bool { !self.pending.is_empty() }

    async fn close(self) -> Result<(), TransportError> {
        let errors = match self.socket {
            Kind::Push(s) => s.close().await,
            Kind::Pull(s) => s.close().await,
            Kind::Req(s) => s.close().await,
            Kind::Rep(s) => s.close().await,
            Kind::Pub(s) => s.close().await,
            Kind::Sub(s) => s.close().await,
        };
        if errors.is_empty() {
            debug!(address = %self.address, "endpoint closed");
            Ok(())
        } else {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(TransportError::Close(joined))
        }
    }
}
