//! Chopher Synthetic Corpora
//!
//! This crate generates deterministic byte streams that stand in for real files
//! when sonifying data. Three generators are provided:
//!
//! - **Random** - [`BoundedRandomStream`], a finite stream of uniform bytes
//! - **Structured** - [`TiledStructuredStream`], a 4-byte block that is
//!   re-scrambled by the rank permutation every time it is exhausted
//! - **Holo** - [`GaussianHoloStream`], Gaussian-skewed symbols decoded through
//!   a move-to-front list and then rank-permuted as a whole
//!
//! # Determinism
//!
//! Every stream owns its own PCG32 generator created from the caller's seed.
//! There is no process-wide generator, so two streams built with the same size
//! and seed always produce the same bytes.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use chopher_corpus::TiledStructuredStream;
//!
//! let mut stream = TiledStructuredStream::new(16, 42).unwrap();
//! let mut bytes = Vec::new();
//! stream.read_to_end(&mut bytes).unwrap();
//! assert_eq!(bytes.len(), 16);
//! ```
//!
//! # Crate Structure
//!
//! - [`rank`] - In-place rank permutation (counting sort + cycle following)
//! - [`mtf`] - Array-backed move-to-front decoder
//! - [`random`], [`structured`], [`holo`] - The stream generators
//! - [`source`] - Selecting a generator by kind
//! - [`rng`] - Seeded generator construction

pub mod error;
pub mod holo;
pub mod mtf;
pub mod random;
pub mod rank;
pub mod rng;
pub mod source;
pub mod structured;

// Re-export main types at crate root
pub use error::{CorpusError, CorpusResult};
pub use holo::GaussianHoloStream;
pub use mtf::MoveToFrontDecoder;
pub use random::{BoundedRandomStream, StreamChunk};
pub use rank::{invert, RankTable};
pub use source::{open_corpus, CorpusKind, DEFAULT_CORPUS_SIZE};
pub use structured::TiledStructuredStream;
