//! Determinism checks.
//!
//! Every corpus and every rendered WAV must be byte-identical across runs for
//! the same seed or input. [`verify_determinism`] runs a generator several
//! times and, on mismatch, reports the first differing byte with context.
//!
//! # Example
//!
//! ```
//! use chopher_corpus::TiledStructuredStream;
//! use chopher_tests::determinism::verify_determinism;
//! use std::io::Read;
//!
//! let result = verify_determinism(
//!     || {
//!         let mut bytes = Vec::new();
//!         TiledStructuredStream::new(64, 42)
//!             .unwrap()
//!             .read_to_end(&mut bytes)
//!             .unwrap();
//!         bytes
//!     },
//!     3,
//! );
//! assert!(result.is_deterministic);
//! ```

pub mod core;
#[macro_use]
pub mod macros;


pub use self::core::{
    assert_deterministic, compute_hash, verify_determinism, DeterminismResult, DiffContext,
    DiffInfo,
};
