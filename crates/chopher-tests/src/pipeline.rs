//! One-call helpers over the corpus and audio crates.

use std::io::{self, Read};

use chopher_audio::{AudioResult, ChannelMode, KarplusSong, SongHasher, Wave};
use chopher_corpus::{open_corpus, CorpusKind};

/// Sampling rate used by the CLI and server.
pub const SAMPLE_RATE: u32 = 22000;

/// Reads a whole corpus into memory.
///
/// Construction errors surface as `InvalidInput`.
pub fn corpus_bytes(kind: CorpusKind, size: usize, seed: i64) -> io::Result<Vec<u8>> {
    let mut corpus = open_corpus(kind, size, seed)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut bytes = Vec::with_capacity(size);
    corpus.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Hashes and renders a byte source the way the CLI does.
pub fn render<R: Read>(source: R) -> AudioResult<Wave> {
    let song = SongHasher::new(source).hash()?;
    let mut wave = Wave::new(ChannelMode::Stereo, SAMPLE_RATE);
    KarplusSong::new(song, SAMPLE_RATE).sound(&mut wave)?;
    Ok(wave)
}

/// Complete WAV file for an in-memory buffer.
pub fn render_wav(bytes: &[u8]) -> AudioResult<Vec<u8>> {
    Ok(render(bytes)?.bytes()?)
}
