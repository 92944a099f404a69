//! In-memory WAV sink.

use std::io::{self, Cursor, Write};

use super::format::WavFormat;
use super::writer::{sample_to_i16, write_wav, write_wav_to_vec};

/// Output channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    /// One channel.
    Mono,
    /// Two channels carrying the same signal.
    #[default]
    Stereo,
}

impl ChannelMode {
    /// Number of interleaved channels.
    pub fn channels(self) -> u16 {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::Stereo => 2,
        }
    }
}

/// Accumulates rendered audio and serializes it as a WAV file.
#[derive(Debug, Clone)]
pub struct Wave {
    mode: ChannelMode,
    format: WavFormat,
    /// Interleaved little-endian 16-bit PCM.
    pcm: Vec<u8>,
}

impl Wave {
    /// Creates an empty wave.
    pub fn new(mode: ChannelMode, sample_rate: u32) -> Self {
        Self {
            mode,
            format: WavFormat::new(mode, sample_rate),
            pcm: Vec::new(),
        }
    }

    /// Appends mono samples, duplicating them across every channel.
    pub fn push_mono(&mut self, samples: &[f64]) {
        let channels = usize::from(self.mode.channels());
        self.pcm.reserve(samples.len() * channels * 2);
        for &sample in samples {
            let bytes = sample_to_i16(sample).to_le_bytes();
            for _ in 0..channels {
                self.pcm.extend_from_slice(&bytes);
            }
        }
    }

    /// Channel layout.
    pub fn channel_mode(&self) -> ChannelMode {
        self.mode
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    /// Container format.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Number of sample frames.
    pub fn num_frames(&self) -> usize {
        self.pcm.len() / usize::from(self.format.block_align())
    }

    pub fn duration_seconds(&self) -> f64 {
        self.num_frames() as f64 / f64::from(self.format.sample_rate)
    }

    /// Raw PCM payload.
    pub fn pcm(&self) -> &[u8] {
        &self.pcm
    }

    /// BLAKE3 hex digest of the PCM payload.
    pub fn pcm_hash(&self) -> String {
        blake3::hash(&self.pcm).to_hex().to_string()
    }

    /// The complete WAV file.
    ///
    /// Fails when the PCM payload is too large for a RIFF container.
    pub fn bytes(&self) -> io::Result<Vec<u8>> {
        write_wav_to_vec(&self.format, &self.pcm)
    }

    /// A reader over the complete WAV file.
    pub fn reader(&self) -> io::Result<Cursor<Vec<u8>>> {
        self.bytes().map(Cursor::new)
    }

    /// Writes the complete WAV file to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_wav(writer, &self.format, &self.pcm)
    }
}
