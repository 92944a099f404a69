//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Each plucked note gets its own generator so that the excitation noise of one
//! note never depends on how many samples earlier notes consumed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Derives the seed for one note of a song.
///
/// Hashes the song seed concatenated with the note index (both little-endian)
/// and keeps the first 8 bytes of the digest.
pub fn derive_note_seed(song_seed: u64, note_index: u32) -> u64 {
    let mut input = [0u8; 12];
    input[..8].copy_from_slice(&song_seed.to_le_bytes());
    input[8..].copy_from_slice(&note_index.to_le_bytes());

    let hash = blake3::hash(&input);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Creates the RNG for one note of a song.
pub fn create_note_rng(song_seed: u64, note_index: u32) -> Pcg32 {
    create_rng(derive_note_seed(song_seed, note_index))
}
