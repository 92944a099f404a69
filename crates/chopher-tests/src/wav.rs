//! Chunk lookup in RIFF/WAVE buffers written by the CLI and server.

/// Finds the payload of the first chunk with the given id.
///
/// Returns `None` when the buffer is not a RIFF/WAVE file or the chunk is
/// missing or truncated.
pub fn find_chunk<'a>(wav_data: &'a [u8], id: &[u8; 4]) -> Option<&'a [u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let size_bytes: [u8; 4] = wav_data[pos + 4..pos + 8].try_into().ok()?;
        let chunk_size = u32::from_le_bytes(size_bytes) as usize;

        let start = pos + 8;
        let end = start.checked_add(chunk_size)?;
        if chunk_id == id {
            return wav_data.get(start..end);
        }

        // Chunks are word aligned
        pos = end + (chunk_size & 1);
    }

    None
}

/// Extracts the PCM payload of a WAV buffer.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    find_chunk(wav_data, b"data")
}

/// BLAKE3 hex digest of the PCM payload of a WAV buffer.
///
/// Matches `Wave::pcm_hash` for files produced from that wave.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
