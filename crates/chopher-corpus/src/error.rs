//! Error types for corpus generation.

use thiserror::Error;

/// Result type for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Errors that can occur while constructing a corpus stream.
///
/// Running out of bytes is not an error; see [`crate::StreamChunk`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorpusError {
    /// Requested corpus size is not usable.
    #[error("invalid corpus size: {size} bytes (must be at least 1)")]
    InvalidSize {
        /// The rejected size.
        size: usize,
    },

    /// Invalid argument value.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl CorpusError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CorpusError::InvalidSize { .. } => "CORPUS_001",
            CorpusError::InvalidArgument { .. } => "CORPUS_002",
        }
    }
}

/// Rejects zero-length corpora.
pub(crate) fn check_size(size: usize) -> CorpusResult<()> {
    if size == 0 {
        return Err(CorpusError::InvalidSize { size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        assert_eq!(check_size(0), Err(CorpusError::InvalidSize { size: 0 }));
        assert!(check_size(1).is_ok());
    }

    #[test]
    fn test_invalid_argument_helper() {
        let err = CorpusError::invalid_argument("corpus", "unknown kind 'zip'");
        assert!(err.to_string().contains("corpus"));
        assert!(err.to_string().contains("unknown kind"));
        assert_eq!(err.code(), "CORPUS_002");
    }
}
