//! CLI argument definitions for the `chopher` binary.

use std::ffi::OsString;
use std::path::PathBuf;

use chopher_corpus::{CorpusKind, DEFAULT_CORPUS_SIZE};
use clap::Parser;

use crate::config::DEFAULT_STATIC_DIR;

/// Chopher - turn bytes into plucked-string songs
///
/// With `--file`, renders the file next to itself as a `.wav`. With a nonzero
/// `--seed`, renders a synthetic corpus to `<seed>.wav`. With neither, serves
/// an upload page on `$PORT`.
#[derive(Parser, Debug)]
#[command(name = "chopher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to render
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Seed for a synthetic corpus (0 = unset)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub seed: i64,

    /// Corpus generator used with --seed (structured, holo, random)
    #[arg(long, default_value_t = CorpusKind::Structured)]
    pub corpus: CorpusKind,

    /// Corpus size in bytes used with --seed
    #[arg(long, default_value_t = DEFAULT_CORPUS_SIZE)]
    pub size: usize,

    /// Directory served by the upload server
    #[arg(long, default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Render a real file.
    File(PathBuf),
    /// Render a seeded synthetic corpus.
    Seed {
        seed: i64,
        corpus: CorpusKind,
        size: usize,
    },
    /// Run the upload server.
    Serve,
}

impl Cli {
    /// Resolves the mode. `--file` wins over `--seed`.
    pub fn mode(&self) -> Mode {
        if let Some(path) = &self.file {
            Mode::File(path.clone())
        } else if self.seed != 0 {
            Mode::Seed {
                seed: self.seed,
                corpus: self.corpus,
                size: self.size,
            }
        } else {
            Mode::Serve
        }
    }
}

/// Long flags that may also be written with a single dash.
const LONG_FLAGS: [&str; 7] = ["file", "seed", "corpus", "size", "static-dir", "help", "version"];

/// Rewrites `-file x` and `-file=x` to their `--` forms.
///
/// Anything else passes through untouched, including negative numbers such
/// as `-7` and every argument after a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                positional = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
