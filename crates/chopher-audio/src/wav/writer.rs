//! RIFF/WAVE serialization and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the canonical header written before the PCM payload.
pub const WAV_HEADER_LEN: usize = 44;

/// Builds the 44-byte header for `data_size` bytes of PCM.
pub fn wav_header(format: &WavFormat, data_size: u32) -> [u8; WAV_HEADER_LEN] {
    let mut header = [0u8; WAV_HEADER_LEN];
    // RIFF size excludes the 8-byte RIFF preamble
    let riff_size = 36u32.saturating_add(data_size);

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&riff_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
    header
}

/// Chunk size recorded for `len` bytes of PCM.
///
/// Fails with `InvalidInput` when the payload does not fit a 32-bit RIFF size.
pub(crate) fn data_chunk_size(len: usize) -> io::Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|size| *size <= u32::MAX - 36)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))
}

/// Writes a complete WAV file to a writer.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = data_chunk_size(pcm_data.len())?;
    writer.write_all(&wav_header(format, data_size))?;
    writer.write_all(pcm_data)
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(WAV_HEADER_LEN + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}

/// Converts one sample to a 16-bit PCM value.
///
/// Clips to `[-1.0, 1.0]` and scales by 32767 with rounding.
pub(crate) fn sample_to_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Converts f64 samples to little-endian 16-bit PCM bytes.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| sample_to_i16(s).to_le_bytes())
        .collect()
}
