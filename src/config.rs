//! Run configuration for a bridge invocation.
//!
//! [`BridgeConfig`] gathers everything a run needs: which pattern to speak,
//! where to attach, and how to buffer input. The binary builds it from the
//! command line; embedders can build it directly.

use std::num::NonZeroUsize;

use crate::{
    assembler::{Assembler, DEFAULT_CHUNK_CAPACITY},
    pattern::Pattern,
};

/// Settings for one bridge run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Messaging role to open.
    pub pattern: Pattern,
    /// Transport endpoint address, for example `tcp://127.0.0.1:5000`.
    pub endpoint: String,
    /// Bind as a listener instead of connecting.
    pub bind: bool,
    /// Subscription prefix used by `sub` sockets.
    pub subscription: String,
    /// Capacity of each input chunk.
    pub chunk_capacity: NonZeroUsize,
    /// Largest input accepted for sending.
    pub max_payload_size: Option<NonZeroUsize>,
}

impl BridgeConfig {
    /// Configuration that connects a `pattern` socket to `endpoint`.
    ///
    /// # Examples
    ///
    /// ```
    /// use framecat::{config::BridgeConfig, pattern::Pattern};
    ///
    /// let config = BridgeConfig::new(Pattern::Pull, "tcp://127.0.0.1:5000").with_bind(true);
    /// assert!(config.bind);
    /// assert_eq!(config.subscription, "");
    /// ```
    #[must_use]
    pub fn new(pattern: Pattern, endpoint: impl Into<String>) -> Self {
        Self {
            pattern,
            endpoint: endpoint.into(),
            bind: false,
            subscription: String::new(),
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            max_payload_size: None,
        }
    }

    /// Bind instead of connecting.
    #[must_use]
    pub fn with_bind(mut self, bind: bool) -> Self {
        self.bind = bind;
        self
    }

    /// Subscribe to messages starting with `prefix`.
    #[must_use]
    pub fn with_subscription(mut self, prefix: impl Into<String>) -> Self {
        self.subscription = prefix.into();
        self
    }

    /// Use chunks of `capacity` bytes while reading input.
    #[must_use]
    pub fn with_chunk_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.chunk_capacity = capacity;
        self
    }

    /// Refuse inputs longer than `limit` bytes.
    #[must_use]
    pub fn with_max_payload_size(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_payload_size = limit;
        self
    }

    /// Assembler configured for this run.
    #[must_use]
    pub fn assembler(&self) -> Assembler {
        Assembler::new(self.chunk_capacity).with_max_payload_size(self.max_payload_size)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::BridgeConfig;
    use crate::{assembler::DEFAULT_CHUNK_CAPACITY, pattern::Pattern};

    #[test]
    fn defaults_connect_without_limits() {
        let config = BridgeConfig::new(Pattern::Push, "tcp://127.0.0.1:5000");

        assert!(!config.bind);
        assert_eq!(config.chunk_capacity, DEFAULT_CHUNK_CAPACITY);
        assert_eq!(config.max_payload_size, None);
        assert_eq!(config.endpoint, "tcp://127.0.0.1:5000");
    }

    #[test]
    fn assembler_inherits_buffer_settings() {
        let capacity = NonZeroUsize::new(64).expect("non-zero");
        let limit = NonZeroUsize::new(1024);
        let assembler = BridgeConfig::new(Pattern::Req, "ipc:///tmp/framecat")
            .with_chunk_capacity(capacity)
            .with_max_payload_size(limit)
            .assembler();

        assert_eq!(assembler.chunk_capacity(), capacity);
        assert_eq!(assembler.max_payload_size(), limit);
    }
}
