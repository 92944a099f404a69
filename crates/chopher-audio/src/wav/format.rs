//! WAV file format parameters.

use super::wave::ChannelMode;

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates the format for a channel mode.
    pub fn new(mode: ChannelMode, sample_rate: u32) -> Self {
        Self {
            channels: mode.channels(),
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Creates a mono WAV format.
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(ChannelMode::Mono, sample_rate)
    }

    /// Creates a stereo WAV format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(ChannelMode::Stereo, sample_rate)
    }

    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per sample frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Bytes per second.
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
