//! Fixed-capacity chunks used to buffer input of unknown length.
//!
//! A [`ChunkChain`] owns its chunks in acquisition order. Every chunk except
//! the last is full; dropping the chain releases all of them.

use std::num::NonZeroUsize;

#[cfg(test)]
use std::cell::Cell;

#[cfg(test)]
thread_local! {
    static LIVE_CHUNKS: Cell<usize> = const { Cell::new(0) };
}

/// Number of chunks currently alive on this thread.
#[cfg(test)]
pub(crate) fn live_chunks() -> usize { LIVE_CHUNKS.with(Cell::get) }

/// A fixed-capacity byte block with a count of valid bytes.
#[derive(Debug)]
pub(crate) struct Chunk {
    data: Box<[u8]>,
    len: usize,
}

impl Chunk {
    fn new(capacity: NonZeroUsize) -> Self {
        #[cfg(test)]
        LIVE_CHUNKS.with(|live| live.set(live.get() + 1));
        Self {
            data: vec![0; capacity.get()].into_boxed_slice(),
            len: 0,
        }
    }

    pub(crate) fn is_full(&self) -> bool { self.len == self.data.len() }

    /// Copy as much of `src` as fits and return the number of bytes taken.
    pub(crate) fn fill_from(&mut self, src: &[u8]) -> usize {
        let taken = src.len().min(self.data.len() - self.len);
        self.data[self.len..self.len + taken].copy_from_slice(&src[..taken]);
        self.len += taken;
        taken
    }

    pub(crate) fn valid(&self) -> &[u8] { &self.data[..self.len] }
}

#[cfg(test)]
impl Drop for Chunk {
    fn drop(&mut self) { LIVE_CHUNKS.with(|live| live.set(live.get() - 1)); }
}

/// Ordered, owning chain of chunks.
///
/// The head chunk is allocated up front; later chunks are appended only
/// when more input is known to exist.
#[derive(Debug)]
pub(crate) struct ChunkChain {
    capacity: NonZeroUsize,
    chunks: Vec<Chunk>,
    total: usize,
}

impl ChunkChain {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            chunks: vec![Chunk::new(capacity)],
            total: 0,
        }
    }

    /// The chunk currently being filled.
    pub(crate) fn tail_mut(&mut self) -> &mut Chunk {
        let last = self.chunks.len() - 1;
        &mut self.chunks[last]
    }

    /// Append an empty chunk. Only valid once the current tail is full.
    pub(crate) fn grow(&mut self) {
        debug_assert!(self.chunks.last().is_some_and(Chunk::is_full));
        self.chunks.push(Chunk::new(self.capacity));
    }

    /// Fill the tail from `src`, updating the running total.
    pub(crate) fn fill_from(&mut self, src: &[u8]) -> usize {
        let taken = self.tail_mut().fill_from(src);
        self.total += taken;
        taken
    }

    pub(crate) fn total(&self) -> usize { self.total }

    pub(crate) fn len(&self) -> usize { self.chunks.len() }

    /// Copy every chunk's valid bytes into `out` in chain order.
    ///
    /// `out` must already have room for [`total`](Self::total) bytes so the
    /// copy never reallocates.
    pub(crate) fn copy_into(&self, out: &mut Vec<u8>) {
        debug_assert!(out.capacity() - out.len() >= self.total);
        let last = self.chunks.len() - 1;
        for (index, chunk) in self.chunks.iter().enumerate() {
            debug_assert!(index == last || chunk.is_full());
            out.extend_from_slice(chunk.valid());
        }
    }
}
