//! File command implementation
//!
//! Renders a real file to `<path without extension>.wav`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use super::{sonify, write_wave};
use crate::config::Settings;

/// Output path for an input file: everything from the last dot of the file
/// name is replaced by `.wav`, so `.bashrc` becomes `.wav`.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = name.rfind('.').map_or(&*name, |dot| &name[..dot]);
    input.with_file_name(format!("{}.wav", stem))
}

/// Run the file command
///
/// # Returns
/// Exit code: 0 on success. Open, read and write failures are errors.
pub fn run(input: &Path, settings: &Settings) -> Result<ExitCode> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    let wave = sonify(BufReader::new(file), settings)?;

    let out = output_path(input);
    write_wave(&wave, &out)?;

    info!(
        input = %input.display(),
        output = %out.display(),
        frames = wave.num_frames(),
        pcm_hash = %wave.pcm_hash(),
        "rendered file"
    );
    println!("{} {}", "Wrote:".green().bold(), out.display());

    Ok(ExitCode::SUCCESS)
}
