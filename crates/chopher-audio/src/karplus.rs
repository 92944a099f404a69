//! Karplus-Strong synthesis for plucked string sounds.
//!
//! The Karplus-Strong algorithm creates realistic plucked string sounds using
//! a simple feedback delay line with lowpass filtering. The initial noise burst
//! decays into a pitched tone.
//!
//! [`KarplusSong`] plucks one string per note of a [`Song`] and mixes the
//! overlapping voices into a [`Wave`].

use rand::Rng;

use crate::error::{AudioError, AudioResult};
use crate::rng::create_note_rng;
use crate::song::Song;
use crate::wav::Wave;

/// Lowest accepted sampling rate.
pub const MIN_SAMPLE_RATE: u32 = 8000;
/// Highest accepted sampling rate.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Feedback decay applied to every string.
const STRING_DECAY: f64 = 0.996;
/// Sixteenths a voice keeps ringing past the end of its note.
const RING_OUT_SIXTEENTHS: usize = 8;
/// Fade applied to the end of every voice, in seconds.
const FADE_SECONDS: f64 = 0.01;
/// Peak level of the final mix.
const PEAK_LEVEL: f64 = 0.9;

/// Karplus-Strong synthesis parameters.
#[derive(Debug, Clone)]
pub struct KarplusStrong {
    /// Base frequency in Hz.
    pub frequency: f64,
    /// Decay factor (0.0 to 1.0). Higher = longer sustain.
    pub decay: f64,
    /// Blend factor for lowpass filter (0.0 to 1.0). Higher = brighter.
    pub blend: f64,
}

impl KarplusStrong {
    /// Creates a new Karplus-Strong synthesizer.
    ///
    /// # Arguments
    /// * `frequency` - Base frequency in Hz
    /// * `decay` - Decay factor (0.9-0.999 typical)
    /// * `blend` - Brightness (0.5 = dark, 0.9 = bright)
    pub fn new(frequency: f64, decay: f64, blend: f64) -> Self {
        Self {
            frequency,
            decay: decay.clamp(0.0, 0.9999),
            blend: blend.clamp(0.0, 1.0),
        }
    }

    /// Generates `num_samples` samples of the plucked string.
    pub fn synthesize<R: Rng>(&self, num_samples: usize, sample_rate: f64, rng: &mut R) -> Vec<f64> {
        // Calculate delay line length based on frequency
        let delay_length = (sample_rate / self.frequency).round() as usize;
        if delay_length == 0 {
            return vec![0.0; num_samples];
        }

        // Initialize delay line with noise burst
        let mut delay_line: Vec<f64> = (0..delay_length)
            .map(|_| rng.gen::<f64>() * 2.0 - 1.0)
            .collect();

        let mut output = Vec::with_capacity(num_samples);
        let mut pos = 0;

        for _ in 0..num_samples {
            let next_pos = (pos + 1) % delay_length;

            // Two-point average lowpass filter with blend
            let current = delay_line[pos];
            let next = delay_line[next_pos];
            let filtered = self.blend * current + (1.0 - self.blend) * next;

            delay_line[pos] = filtered * self.decay;
            output.push(current);

            pos = next_pos;
        }

        output
    }
}

/// A song ready to be rendered at a sampling rate.
#[derive(Debug, Clone)]
pub struct KarplusSong {
    /// The song to play.
    pub song: Song,
    /// Output sampling rate in Hz.
    pub sampling_rate: u32,
}

impl KarplusSong {
    /// Pairs a song with a sampling rate.
    pub fn new(song: Song, sampling_rate: u32) -> Self {
        Self {
            song,
            sampling_rate,
        }
    }

    /// Renders the song as mono samples in `[-PEAK_LEVEL, PEAK_LEVEL]`.
    pub fn render(&self) -> AudioResult<Vec<f64>> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sampling_rate) {
            return Err(AudioError::InvalidSampleRate {
                rate: self.sampling_rate,
                min: MIN_SAMPLE_RATE,
                max: MAX_SAMPLE_RATE,
            });
        }

        let sample_rate = f64::from(self.sampling_rate);
        let sixteenth = ((self.song.sixteenth_seconds() * sample_rate).round() as usize).max(1);
        let tail = RING_OUT_SIXTEENTHS * sixteenth;
        let fade = ((FADE_SECONDS * sample_rate) as usize).max(1);

        let mut mix = vec![0.0; self.song.total_sixteenths() * sixteenth + tail];
        let mut start = 0;

        for (index, note) in self.song.notes.iter().enumerate() {
            let length = note.sixteenths as usize * sixteenth;
            if !note.rest {
                let string =
                    KarplusStrong::new(self.song.frequency(note), STRING_DECAY, note.brightness);
                let mut rng = create_note_rng(self.song.seed, index as u32);
                let mut voice = string.synthesize(length + tail, sample_rate, &mut rng);
                fade_out(&mut voice, fade);

                for (out, sample) in mix[start..].iter_mut().zip(voice) {
                    *out += sample * note.velocity;
                }
            }
            start += length;
        }

        normalize(&mut mix, PEAK_LEVEL);
        Ok(mix)
    }

    /// Renders the song into `wave`.
    pub fn sound(&self, wave: &mut Wave) -> AudioResult<()> {
        if wave.sample_rate() != self.sampling_rate {
            return Err(AudioError::invalid_param(
                "sampling_rate",
                format!(
                    "song renders at {} Hz but the wave expects {} Hz",
                    self.sampling_rate,
                    wave.sample_rate()
                ),
            ));
        }

        let samples = self.render()?;
        wave.push_mono(&samples);
        Ok(())
    }
}

/// Linearly fades the last `len` samples to silence.
fn fade_out(samples: &mut [f64], len: usize) {
    let len = len.min(samples.len());
    let start = samples.len() - len;
    for (i, sample) in samples[start..].iter_mut().enumerate() {
        *sample *= 1.0 - (i + 1) as f64 / len as f64;
    }
}

/// Scales `samples` so the largest magnitude equals `peak`.
fn normalize(samples: &mut [f64], peak: f64) {
    let max = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    if max > 0.0 {
        let gain = peak / max;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}
