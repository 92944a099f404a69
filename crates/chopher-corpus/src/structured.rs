//! Self-similar stream built by tiling a re-scrambled seed block.
//!
//! A 4-byte block is drawn from the generator and copied into the output one
//! byte at a time. Whenever the block has been fully copied it is rewritten in
//! place by [`rank::invert`](crate::rank::invert), so consecutive 4-byte eras
//! are each the rank permutation of the previous era.

use std::io::{self, Cursor, Read};

use rand::Rng;

use crate::error::{check_size, CorpusResult};
use crate::rank::invert;
use crate::rng::create_rng;

/// Length of the seed block, in bytes.
pub const SEED_BLOCK_LEN: usize = 4;

/// Finite, forward-only reader over an eagerly built structured corpus.
#[derive(Debug)]
pub struct TiledStructuredStream {
    reader: Cursor<Vec<u8>>,
}

impl TiledStructuredStream {
    /// Builds a `size`-byte corpus seeded with `seed`.
    pub fn new(size: usize, seed: i64) -> CorpusResult<Self> {
        Self::with_rng(size, &mut create_rng(seed))
    }

    /// Builds a `size`-byte corpus drawing the seed block from `rng`.
    pub fn with_rng<R: Rng>(size: usize, rng: &mut R) -> CorpusResult<Self> {
        check_size(size)?;

        let mut block = [0u8; SEED_BLOCK_LEN];
        rng.fill(&mut block[..]);

        let mut out = vec![0u8; size];
        for era in out.chunks_mut(SEED_BLOCK_LEN) {
            era.copy_from_slice(&block[..era.len()]);
            if era.len() == SEED_BLOCK_LEN {
                invert(&mut block);
            }
        }

        Ok(Self {
            reader: Cursor::new(out),
        })
    }

    /// Total corpus length.
    pub fn len(&self) -> usize {
        self.reader.get_ref().len()
    }

    /// Returns true if the corpus has no bytes.
    pub fn is_empty(&self) -> bool {
        self.reader.get_ref().is_empty()
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.len() - self.reader.position() as usize
    }
}

impl Read for TiledStructuredStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}
