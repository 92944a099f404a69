//! Fixed-shape song model derived from a digest.
//!
//! A [`Song`] is a tempo, a key, a scale and exactly [`Song::NOTES`] notes.
//! [`Song::from_seed_bytes`] maps [`SONG_SEED_LEN`] bytes onto those fields;
//! the digest layer supplies the bytes.

/// Number of seed bytes consumed by [`Song::from_seed_bytes`].
pub const SONG_SEED_LEN: usize = 16 + NOTE_COUNT * 4;

/// Number of notes in every song.
pub const NOTE_COUNT: usize = 64;

/// Lowest tempo, in beats per minute.
const MIN_TEMPO: u16 = 80;
/// Number of distinct tempos above [`MIN_TEMPO`].
const TEMPO_SPAN: u16 = 80;
/// Lowest tonic (A2).
const MIN_TONIC: u8 = 45;
/// Scale degrees available to a note (two octaves of a 7-note scale).
const DEGREES: u8 = 14;
/// Note lengths, in sixteenths.
const LENGTHS: [u8; 4] = [1, 2, 4, 8];

/// Musical scale of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Ionian.
    Major,
    /// Natural minor.
    Minor,
    /// Major pentatonic.
    Pentatonic,
    /// Dorian mode.
    Dorian,
}

impl Scale {
    /// Semitone offsets of one octave.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Pentatonic => &[0, 2, 4, 7, 9],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
        }
    }

    /// Semitones above the tonic for a scale degree, wrapping into higher octaves.
    pub fn semitones(&self, degree: u8) -> u8 {
        let intervals = self.intervals();
        let len = intervals.len() as u8;
        12 * (degree / len) + intervals[(degree % len) as usize]
    }

    fn from_byte(byte: u8) -> Self {
        match byte % 4 {
            0 => Scale::Major,
            1 => Scale::Minor,
            2 => Scale::Pentatonic,
            _ => Scale::Dorian,
        }
    }
}

/// One plucked note (or rest).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Note {
    /// Scale degree above the tonic, `0..14`.
    pub degree: u8,
    /// Length in sixteenth notes: 1, 2, 4 or 8.
    pub sixteenths: u8,
    /// Pluck strength, `0.35..=1.0`.
    pub velocity: f64,
    /// Lowpass blend of the string, `0.5..=0.95`. Higher is brighter.
    pub brightness: f64,
    /// Silent for its length when set.
    pub rest: bool,
}

impl Note {
    fn from_bytes(bytes: [u8; 4]) -> Self {
        let [pitch, rhythm, strength, tone] = bytes;
        Self {
            degree: pitch % DEGREES,
            sixteenths: LENGTHS[(rhythm & 0x03) as usize],
            // One note in eight rests.
            rest: (rhythm >> 2) & 0x07 == 0,
            velocity: 0.35 + 0.65 * f64::from(strength) / 255.0,
            brightness: 0.5 + 0.45 * f64::from(tone) / 255.0,
        }
    }
}

/// A song derived from a byte source.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Tempo in quarter-note beats per minute.
    pub tempo_bpm: u16,
    /// MIDI note number of the tonic.
    pub tonic: u8,
    /// Scale the notes are drawn from.
    pub scale: Scale,
    /// The notes, in order.
    pub notes: [Note; NOTE_COUNT],
    /// Seed for string excitation noise.
    pub seed: u64,
    /// Number of source bytes the song was derived from.
    pub source_len: u64,
}

impl Song {
    /// Number of notes in every song.
    pub const NOTES: usize = NOTE_COUNT;

    /// Builds a song from digest bytes.
    pub fn from_seed_bytes(bytes: &[u8; SONG_SEED_LEN], source_len: u64) -> Self {
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&bytes[8..16]);

        let notes = std::array::from_fn(|i| {
            let at = 16 + i * 4;
            Note::from_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        });

        Self {
            tempo_bpm: MIN_TEMPO + u16::from(bytes[0]) % TEMPO_SPAN,
            tonic: MIN_TONIC + bytes[1] % 12,
            scale: Scale::from_byte(bytes[2]),
            notes,
            seed: u64::from_le_bytes(seed),
            source_len,
        }
    }

    /// Length of a sixteenth note in seconds.
    pub fn sixteenth_seconds(&self) -> f64 {
        60.0 / f64::from(self.tempo_bpm) / 4.0
    }

    /// Total length of all notes, in sixteenths.
    pub fn total_sixteenths(&self) -> usize {
        self.notes.iter().map(|n| n.sixteenths as usize).sum()
    }

    /// MIDI note number of a note.
    pub fn midi_note(&self, note: &Note) -> u8 {
        self.tonic + self.scale.semitones(note.degree)
    }

    /// Frequency of a note in Hz.
    pub fn frequency(&self, note: &Note) -> f64 {
        midi_to_frequency(self.midi_note(note))
    }
}

/// Converts a MIDI note number to a frequency in Hz (A4 = 440 Hz).
pub fn midi_to_frequency(midi_note: u8) -> f64 {
    440.0 * 2.0_f64.powf((f64::from(midi_note) - 69.0) / 12.0)
}
