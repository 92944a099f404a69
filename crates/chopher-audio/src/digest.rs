//! Streaming digest of a byte source into a [`Song`].
//!
//! The source is read in fixed-size chunks and fed to BLAKE3, so arbitrarily
//! large files and synthetic corpora are hashed without being held in memory.
//! The digest's extendable output then provides the song's seed bytes.

use std::io::{ErrorKind, Read};

use crate::error::AudioResult;
use crate::song::{Song, SONG_SEED_LEN};

/// Read buffer size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Derives a song from any byte source.
#[derive(Debug)]
pub struct SongHasher<R> {
    reader: R,
}

impl<R: Read> SongHasher<R> {
    /// Wraps a byte source.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Consumes the whole source and returns its song.
    ///
    /// Reading stops at the first zero-length read. Interrupted reads are
    /// retried; any other I/O error is returned.
    pub fn hash(mut self) -> AudioResult<Song> {
        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            let n = match self.reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            hasher.update(&buf[..n]);
            total += n as u64;
        }

        let mut seed = [0u8; SONG_SEED_LEN];
        hasher.finalize_xof().fill(&mut seed);
        Ok(Song::from_seed_bytes(&seed, total))
    }
}

/// Derives a song from an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> Song {
    let mut seed = [0u8; SONG_SEED_LEN];
    blake3::Hasher::new()
        .update(bytes)
        .finalize_xof()
        .fill(&mut seed);
    Song::from_seed_bytes(&seed, bytes.len() as u64)
}
