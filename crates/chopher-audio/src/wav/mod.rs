//! Deterministic WAV container.
//!
//! [`Wave`] collects rendered samples and emits a 16-bit PCM WAV file with no
//! timestamps or variable metadata, so equal samples give byte-identical
//! files. The BLAKE3 hash of the PCM payload identifies the audio itself.

mod format;
mod wave;
mod writer;


pub use format::WavFormat;
pub use wave::{ChannelMode, Wave};
pub use writer::{samples_to_pcm16, wav_header, write_wav, write_wav_to_vec, WAV_HEADER_LEN};
