//! Recency-biased corpus from Gaussian symbol ranks.
//!
//! Built in three passes over one buffer:
//!
//! 1. Sample `|N(0, 8)|`, clamped to 256 and truncated to a byte. Most samples
//!    are small, with a long tail of rare large ones.
//! 2. Treat the samples as move-to-front indices and decode them, which turns
//!    the skew into locally repetitive, recency-biased data.
//! 3. Apply the rank permutation once to the whole buffer.

use std::io::{self, Cursor, Read};

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{check_size, CorpusError, CorpusResult};
use crate::mtf::MoveToFrontDecoder;
use crate::rank::invert;
use crate::rng::create_rng;

/// Standard deviation of the symbol-rank distribution.
pub const SYMBOL_STD_DEV: f64 = 8.0;

/// Upper clamp applied to each sample before truncation.
const SAMPLE_CLAMP: f64 = 256.0;

/// Finite, forward-only reader over an eagerly built holo corpus.
#[derive(Debug)]
pub struct GaussianHoloStream {
    reader: Cursor<Vec<u8>>,
}

impl GaussianHoloStream {
    /// Builds a `size`-byte corpus seeded with `seed`.
    pub fn new(size: usize, seed: i64) -> CorpusResult<Self> {
        Self::with_rng(size, &mut create_rng(seed))
    }

    /// Builds a `size`-byte corpus sampling from `rng`.
    pub fn with_rng<R: Rng>(size: usize, rng: &mut R) -> CorpusResult<Self> {
        check_size(size)?;

        let normal = Normal::new(0.0, SYMBOL_STD_DEV)
            .map_err(|e| CorpusError::invalid_argument("std_dev", e.to_string()))?;

        let mut out: Vec<u8> = (0..size).map(|_| symbol(normal.sample(rng))).collect();

        MoveToFrontDecoder::new().decode_in_place(&mut out);
        invert(&mut out);

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

impl Read for GaussianHoloStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Folds a sample, clamps it to 256 and keeps the low byte.
fn symbol(sample: f64) -> u8 {
    (sample.abs().min(SAMPLE_CLAMP) as u16) as u8
}
