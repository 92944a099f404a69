//! Error types for the audio pipeline.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while hashing, rendering or writing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate} Hz (expected {min}..={max})")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
        /// Lowest accepted rate.
        min: u32,
        /// Highest accepted rate.
        max: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// I/O error while reading the byte source or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidSampleRate { .. } => "AUDIO_001",
            AudioError::InvalidParameter { .. } => "AUDIO_002",
            AudioError::Io(_) => "AUDIO_003",
        }
    }
}
