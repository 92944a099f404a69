//! Command implementations.
//!
//! Both commands share one pipeline: hash a byte source into a song, render
//! it with plucked strings, and write the WAV next to the caller's choice of
//! path.

pub mod file;
pub mod seed;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chopher_audio::{KarplusSong, SongHasher, Wave};
use tracing::debug;

use crate::config::Settings;

/// Hashes `source` and renders its song.
pub fn sonify<R: Read>(source: R, settings: &Settings) -> Result<Wave> {
    let song = SongHasher::new(source)
        .hash()
        .context("Failed to read input")?;
    debug!(
        source_len = song.source_len,
        tempo = song.tempo_bpm,
        tonic = song.tonic,
        "hashed song"
    );

    let mut wave = Wave::new(settings.channel_mode, settings.sample_rate);
    KarplusSong::new(song, settings.sample_rate)
        .sound(&mut wave)
        .context("Failed to render song")?;
    Ok(wave)
}

/// Writes `wave` to `path`, replacing any existing file.
pub fn write_wave(wave: &Wave, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    wave.write_to(&mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
