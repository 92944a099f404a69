//! Chopher Audio
//!
//! Turns an arbitrary byte source into a WAV file in three stages:
//!
//! - **Digest** - [`SongHasher`] streams the bytes through BLAKE3 and expands
//!   the digest into a fixed-shape [`Song`]
//! - **Synthesis** - [`KarplusSong`] renders the song with plucked-string
//!   (Karplus-Strong) voices
//! - **Container** - [`Wave`] collects the samples and emits a 16-bit PCM WAV
//!
//! # Determinism
//!
//! Given the same input bytes, sampling rate and channel mode, the WAV output
//! is byte-identical across runs. String excitation noise comes from PCG32
//! generators whose seeds are derived from the song via BLAKE3.
//!
//! # Example
//!
//! ```
//! use chopher_audio::{ChannelMode, KarplusSong, SongHasher, Wave};
//!
//! let song = SongHasher::new(&b"hello"[..]).hash().unwrap();
//! let mut wave = Wave::new(ChannelMode::Stereo, 22000);
//! KarplusSong::new(song, 22000).sound(&mut wave).unwrap();
//! assert_eq!(&wave.bytes().unwrap()[0..4], b"RIFF");
//! ```

pub mod digest;
pub mod error;
pub mod karplus;
pub mod rng;
pub mod song;
pub mod wav;

// Re-export main types at crate root
pub use digest::SongHasher;
pub use error::{AudioError, AudioResult};
pub use karplus::{KarplusSong, KarplusStrong};
pub use song::{Note, Scale, Song};
pub use wav::{ChannelMode, Wave, WavFormat};
