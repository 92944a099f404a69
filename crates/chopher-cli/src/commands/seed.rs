//! Seed command implementation
//!
//! Renders a synthetic corpus built from a numeric seed to `<seed>.wav`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chopher_corpus::{open_corpus, CorpusKind};
use colored::Colorize;
use tracing::info;

use super::{sonify, write_wave};
use crate::config::Settings;

/// File name written for a seed.
pub fn output_name(seed: i64) -> String {
    format!("{}.wav", seed)
}

/// Run the seed command
///
/// # Arguments
/// * `seed` - Corpus seed (nonzero)
/// * `kind` - Corpus generator
/// * `size` - Corpus size in bytes
/// * `out_dir` - Directory receiving `<seed>.wav`
///
/// # Returns
/// Exit code: 0 on success
pub fn run(
    seed: i64,
    kind: CorpusKind,
    size: usize,
    out_dir: &Path,
    settings: &Settings,
) -> Result<ExitCode> {
    let corpus = open_corpus(kind, size, seed)
        .with_context(|| format!("Failed to build {} corpus", kind))?;
    let wave = sonify(corpus, settings)?;

    let out: PathBuf = out_dir.join(output_name(seed));
    write_wave(&wave, &out)?;

    info!(
        seed,
        corpus = %kind,
        size,
        output = %out.display(),
        pcm_hash = %wave.pcm_hash(),
        "rendered corpus"
    );
    println!("{} {}", "Wrote:".green().bold(), out.display());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(output_name(42), "42.wav");
        assert_eq!(output_name(-3), "-3.wav");
    }

    #[test]
    fn test_run_writes_seed_wav() {
        let tmp = tempfile::tempdir().unwrap();
        run(42, CorpusKind::Structured, 4096, tmp.path(), &Settings::default()).unwrap();

        let reader = hound::WavReader::open(tmp.path().join("42.wav")).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().bits_per_sample, 16);
    }

    #[test]
    fn test_corpus_kinds_sound_different() {
        let tmp = tempfile::tempdir().unwrap();
        let mut outputs = Vec::new();
        for kind in CorpusKind::ALL {
            let dir = tmp.path().join(kind.as_str());
            std::fs::create_dir(&dir).unwrap();
            run(9, kind, 4096, &dir, &Settings::default()).unwrap();
            outputs.push(std::fs::read(dir.join("9.wav")).unwrap());
        }
        assert_ne!(outputs[0], outputs[1]);
        assert_ne!(outputs[1], outputs[2]);
    }

    #[test]
    fn test_zero_size_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run(1, CorpusKind::Random, 0, tmp.path(), &Settings::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("random corpus"));
        assert!(!tmp.path().join("1.wav").exists());
    }
}
