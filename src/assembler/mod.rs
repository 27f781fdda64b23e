//! Buffering of standard input into a single outbound payload.
//!
//! The input length is unknown until end of stream, while the transport
//! wants one exactly-sized contiguous buffer. [`Assembler`] therefore reads
//! into a chain of fixed-capacity chunks, allocating one chunk per full block
//! of input and never reallocating, then performs a single consolidation
//! copy into a payload of the exact total length.
//!
//! A chunk is filled until it is full or the reader reaches end of stream.
//! The next chunk is allocated only once the reader has proven that more
//! input exists, so an input of exactly `k * capacity` bytes occupies `k`
//! chunks and empty input occupies only the head chunk.

mod chunk;
pub mod error;

#[cfg(test)]
use std::cell::Cell;
use std::num::NonZeroUsize;

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use self::chunk::ChunkChain;
pub use self::error::AssembleError;

/// Default capacity of a single input chunk, in bytes.
pub const DEFAULT_CHUNK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8192) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

#[cfg(test)]
thread_local! {
    static REFUSE_RESERVATION: Cell<bool> = const { Cell::new(false) };
}

/// Make payload reservations on this thread fail while `refuse` is set.
#[cfg(test)]
pub(crate) fn refuse_reservation(refuse: bool) { REFUSE_RESERVATION.with(|r| r.set(refuse)); }

/// Reserve a payload buffer of exactly `total` bytes.
fn reserve_payload(total: usize) -> Result<Vec<u8>, AssembleError> {
    #[cfg(test)]
    let request = if REFUSE_RESERVATION.with(Cell::get) { usize::MAX } else { total };
    #[cfg(not(test))]
    let request = total;

    let mut payload = Vec::new();
    payload
        .try_reserve_exact(request)
        .map_err(|_| AssembleError::Allocation { requested: total })?;
    Ok(payload)
}

/// Outbound payload produced by [`Assembler::assemble`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembled {
    payload: Bytes,
    chunks: usize,
}

impl Assembled {
    /// Borrow the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Exact payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.payload.len() }

    /// Whether the input was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.payload.is_empty() }

    /// Number of chunks that were allocated while reading the input.
    #[must_use]
    pub const fn chunk_count(&self) -> usize { self.chunks }

    /// Take ownership of the payload for sending.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }
}

/// Reads an input stream to completion and consolidates it into one payload.
#[derive(Clone, Copy, Debug)]
pub struct Assembler {
    chunk_capacity: NonZeroUsize,
    max_payload_size: Option<NonZeroUsize>,
}

impl Default for Assembler {
    fn default() -> Self { Self::new(DEFAULT_CHUNK_CAPACITY) }
}

impl Assembler {
    /// Create an assembler using chunks of `chunk_capacity` bytes.
    #[must_use]
    pub const fn new(chunk_capacity: NonZeroUsize) -> Self {
        Self {
            chunk_capacity,
            max_payload_size: None,
        }
    }

    /// Refuse inputs longer than `limit` bytes.
    #[must_use]
    pub const fn with_max_payload_size(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_payload_size = limit;
        self
    }

    /// Configured chunk capacity.
    #[must_use]
    pub const fn chunk_capacity(&self) -> NonZeroUsize { self.chunk_capacity }

    /// Configured payload cap, if any.
    #[must_use]
    pub const fn max_payload_size(&self) -> Option<NonZeroUsize> { self.max_payload_size }

    /// Read `reader` until end of stream and return its bytes as one payload.
    ///
    /// Empty input yields a valid zero-length payload.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::Read`] if the reader fails,
    /// [`AssembleError::TooLarge`] if the input crosses the configured cap and
    /// [`AssembleError::Allocation`] if the payload buffer cannot be reserved.
    /// The chunk chain is released before any error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use framecat::assembler::Assembler;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let assembler = Assembler::new(NonZeroUsize::new(4).expect("non-zero"));
    /// let mut input: &[u8] = b"hello";
    /// let assembled = assembler.assemble(&mut input).await.expect("assemble");
    /// assert_eq!(assembled.payload(), b"hello");
    /// assert_eq!(assembled.chunk_count(), 2);
    /// # });
    /// ```
    pub async fn assemble<R>(&self, reader: &mut R) -> Result<Assembled, AssembleError>
    where
        R: AsyncBufRead + Unpin + ?Sized,
    {
        let mut chain = ChunkChain::new(self.chunk_capacity);
        self.ingest(reader, &mut chain).await?;

        let total = chain.total();
        let mut payload = reserve_payload(total)?;
        chain.copy_into(&mut payload);

        let chunks = chain.len();
        drop(chain);

        debug!(bytes = total, chunks, "assembled payload");
        Ok(Assembled {
            payload: Bytes::from(payload),
            chunks,
        })
    }

    async fn ingest<R>(&self, reader: &mut R, chain: &mut ChunkChain) -> Result<(), AssembleError>
    where
        R: AsyncBufRead + Unpin + ?Sized,
    {
        loop {
            // A fill_buf that comes back empty is end of stream.
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            if chain.tail_mut().is_full() {
                chain.grow();
            }
            let taken = chain.fill_from(available);
            reader.consume(taken);
            self.check_limit(chain.total())?;
        }
    }

    fn check_limit(&self, total: usize) -> Result<(), AssembleError> {
        match self.max_payload_size {
            Some(limit) if total > limit.get() => Err(AssembleError::TooLarge {
                attempted: total,
                limit,
            }),
            _ => Ok(()),
        }
    }
}
