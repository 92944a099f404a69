//! Seeded PCG32 construction.
//!
//! Every corpus stream owns one of these generators; nothing in the crate
//! touches a shared or thread-local generator.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a signed 64-bit seed.
///
/// The seed's two's-complement bits are used unchanged, so `-1` and
/// `u64::MAX` name the same stream.
pub fn create_rng(seed: i64) -> Pcg32 {
    Pcg32::seed_from_u64(seed as u64)
}
