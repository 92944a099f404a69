//! Selecting a corpus generator by kind.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::error::{CorpusError, CorpusResult};
use crate::holo::GaussianHoloStream;
use crate::random::BoundedRandomStream;
use crate::structured::TiledStructuredStream;

/// Default corpus size for seeded generation (2 MiB).
pub const DEFAULT_CORPUS_SIZE: usize = 2 * 1024 * 1024;

/// Available corpus generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CorpusKind {
    /// [`TiledStructuredStream`].
    #[default]
    Structured,
    /// [`GaussianHoloStream`].
    Holo,
    /// [`BoundedRandomStream`].
    Random,
}

impl CorpusKind {
    /// All kinds, in display order.
    pub const ALL: [CorpusKind; 3] = [CorpusKind::Structured, CorpusKind::Holo, CorpusKind::Random];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusKind::Structured => "structured",
            CorpusKind::Holo => "holo",
            CorpusKind::Random => "random",
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorpusKind {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CorpusKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CorpusError::invalid_argument(
                    "corpus",
                    format!("unknown kind '{}' (expected structured, holo, or random)", s),
                )
            })
    }
}

/// Opens a corpus of `kind` as a boxed byte source.
pub fn open_corpus(kind: CorpusKind, size: usize, seed: i64) -> CorpusResult<Box<dyn Read + Send>> {
    Ok(match kind {
        CorpusKind::Structured => Box::new(TiledStructuredStream::new(size, seed)?),
        CorpusKind::Holo => Box::new(GaussianHoloStream::new(size, seed)?),
        CorpusKind::Random => Box::new(BoundedRandomStream::new(size, seed)?),
    })
}
