//! Bounded stream of uniform pseudo-random bytes.

use std::io::{self, Read};

use rand::{Rng, RngCore};
use rand_pcg::Pcg32;

use crate::error::{check_size, CorpusResult};
use crate::rng::create_rng;

/// Outcome of a single [`BoundedRandomStream::fill`] call.
///
/// `End` is reported on the call that delivers the final byte, together with
/// those bytes. Callers must consume the `n` bytes in both variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamChunk {
    /// `n` bytes were written and more remain.
    Continue(usize),
    /// `n` bytes were written and the budget is now exhausted.
    End(usize),
}

impl StreamChunk {
    /// Number of bytes delivered by this call.
    pub fn len(&self) -> usize {
        match *self {
            StreamChunk::Continue(n) | StreamChunk::End(n) => n,
        }
    }

    /// Returns true if no bytes were delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the stream is exhausted.
    pub fn is_end(&self) -> bool {
        matches!(self, StreamChunk::End(_))
    }
}

/// A finite stream of seeded uniform bytes.
///
/// Bytes are produced lazily on each read; nothing is buffered.
#[derive(Debug, Clone)]
pub struct BoundedRandomStream<R = Pcg32> {
    remaining: usize,
    rng: R,
}

impl BoundedRandomStream<Pcg32> {
    /// Creates a stream of `size` bytes seeded with `seed`.
    pub fn new(size: usize, seed: i64) -> CorpusResult<Self> {
        Self::with_rng(size, create_rng(seed))
    }
}

impl<R: RngCore> BoundedRandomStream<R> {
    /// Creates a stream of `size` bytes drawn from `rng`.
    pub fn with_rng(size: usize, rng: R) -> CorpusResult<Self> {
        check_size(size)?;
        Ok(Self {
            remaining: size,
            rng,
        })
    }

    /// Bytes left in the budget.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Fills as much of `buf` as the budget allows.
    ///
    /// Once exhausted, every further call returns `End(0)`.
    pub fn fill(&mut self, buf: &mut [u8]) -> StreamChunk {
        let n = buf.len().min(self.remaining);
        for byte in &mut buf[..n] {
            *byte = self.rng.gen();
        }
        self.remaining -= n;

        if self.remaining == 0 {
            StreamChunk::End(n)
        } else {
            StreamChunk::Continue(n)
        }
    }
}

impl<R: RngCore> Read for BoundedRandomStream<R> {
    /// Delivers the bytes of each chunk; exhaustion surfaces as the usual
    /// zero-length read on the following call.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.fill(buf).len())
    }
}
