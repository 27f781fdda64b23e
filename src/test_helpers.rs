#![cfg(test)]
//! Test-only helpers for shared test utilities.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;

use crate::endpoint::{Endpoint, TransportError};

/// Operation recorded by [`ScriptedEndpoint`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    /// A message was sent with this payload.
    Send(Bytes),
    /// A frame receive was attempted.
    Receive,
}

/// In-memory endpoint that replays scripted messages and records calls.
#[derive(Debug, Default)]
pub struct ScriptedEndpoint {
    inbox: VecDeque<VecDeque<Bytes>>,
    current: VecDeque<Bytes>,
    calls: Vec<Call>,
    receives: usize,
    fail_receive_at: Option<usize>,
    fail_send: bool,
}

impl ScriptedEndpoint {
    pub fn new() -> Self { Self::default() }

    /// Queue a multipart message to be received.
    pub fn with_message(mut self, frames: Vec<Bytes>) -> Self {
        self.inbox.push_back(frames.into());
        self
    }

    /// Fail the `index`-th receive call (zero based).
    pub fn fail_receive_at(mut self, index: usize) -> Self {
        self.fail_receive_at = Some(index);
        self
    }

    /// Fail every send call.
    pub fn fail_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn calls(&self) -> &[Call] { &self.calls }

    /// Payloads of every recorded send, in order.
    pub fn sent(&self) -> Vec<Bytes> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Send(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Endpoint for ScriptedEndpoint {
    async fn send(&mut self, payload: Bytes) -> Result<(), TransportError> {
        self.calls.push(Call::Send(payload));
        if self.fail_send {
            return Err(TransportError::Other("scripted send failure".into()));
        }
        Ok(())
    }

    async fn receive_frame(&mut self) -> Result<Bytes, TransportError> {
        self.calls.push(Call::Receive);
        let index = self.receives;
        self.receives += 1;
        if self.fail_receive_at == Some(index) {
            return Err(TransportError::Other("scripted receive failure".into()));
        }
        if self.current.is_empty() {
            self.current = self
                .inbox
                .pop_front()
                .ok_or_else(|| TransportError::Other("no message scripted".into()))?;
        }
        Ok(self.current.pop_front().unwrap_or_default())
    }

    fn more_frames_follow(&self) -> bool { !self.current.is_empty() }

    async fn close(self) -> Result<(), TransportError> { Ok(()) }
}
