//! Runtime settings.
//!
//! Rendering constants are fixed; the listen port comes from `$PORT`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chopher_audio::ChannelMode;

/// Sampling rate of every rendered song.
pub const SAMPLE_RATE: u32 = 22000;

/// Port used when `$PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

/// Directory served for `GET` requests when none is given.
pub const DEFAULT_STATIC_DIR: &str = "./static/";

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Settings shared by the commands and the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// TCP port the server listens on.
    pub port: u16,
    /// Root of the static file tree.
    pub static_dir: PathBuf,
    /// Output sampling rate in Hz.
    pub sample_rate: u32,
    /// Output channel layout.
    pub channel_mode: ChannelMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sample_rate: SAMPLE_RATE,
            channel_mode: ChannelMode::Stereo,
        }
    }
}

impl Settings {
    /// Resolves settings from the process environment.
    pub fn from_env(static_dir: impl Into<PathBuf>) -> Result<Self> {
        let port = parse_port(std::env::var(PORT_ENV).ok().as_deref())?;
        Ok(Self {
            port,
            static_dir: static_dir.into(),
            ..Self::default()
        })
    }
}

/// Parses a `$PORT` value. Unset or blank means [`DEFAULT_PORT`].
pub fn parse_port(value: Option<&str>) -> Result<u16> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, raw)),
    }
}
