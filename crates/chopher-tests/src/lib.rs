//! Test support for Chopher.
//!
//! - [`determinism`]: run a generator several times and report the first
//!   differing byte
//! - [`pipeline`]: build corpora and render byte sources to WAV in one call
//! - [`wav`]: locate chunks and hash the PCM payload of written WAV files

pub mod determinism;
pub mod pipeline;
pub mod wav;
