//! Note index to frequency conversion using equal temperament
//! A440 tuning: index 69 = 440 Hz, one semitone per whole step

use std::ops::RangeInclusive;

use super::error::NoteError;
use super::frequency::{Frequency, MAX_HZ, MIN_HZ};

const A4_HZ: f64 = 440.0;
const A4_INDEX: f64 = 69.0;

/// Relative distance from a bound that still counts as landing on it
const BOUND_SNAP: f64 = 1e-12;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a (possibly fractional) note index to Hz
/// Uses equal temperament: f = 440 * 2^((n-69)/12)
pub fn index_to_hz(index: f64) -> f64 {
    A4_HZ * 2.0_f64.powf((index - A4_INDEX) / 12.0)
}

/// Convert Hz to a (possibly fractional) note index
/// Inverse of `index_to_hz`: n = 12 * log2(f/440) + 69
pub fn hz_to_index(hz: f64) -> f64 {
    12.0 * (hz / A4_HZ).log2() + A4_INDEX
}

/// Linear pitch axis over the logarithmic frequency domain
///
/// The index is stored as-is; nothing is validated until a `Frequency` is
/// derived from it. Keeping the index and any `Frequency` elsewhere in sync is
/// up to the owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteIndex {
    index: f64,
}

impl NoteIndex {
    pub fn new(index: f64) -> Self {
        Self { index }
    }

    pub fn from_frequency(freq: impl Into<f64>) -> Self {
        let mut note = Self::default();
        note.set_frequency(freq);
        note
    }

    pub fn index(&self) -> f64 {
        self.index
    }

    /// Accepts any value, including ones that derive an inaudible frequency
    pub fn set_index(&mut self, index: f64) {
        self.index = index;
    }

    /// Derive the frequency for the current index
    ///
    /// Fails with `NoteError::Range` when the index lies outside
    /// `audible_range()`.
    pub fn frequency(&self) -> Result<Frequency, NoteError> {
        Frequency::new(snap_to_bounds(index_to_hz(self.index)))
    }

    /// Recompute the index from a `Frequency` or raw Hz value
    pub fn set_frequency(&mut self, freq: impl Into<f64>) {
        self.index = hz_to_index(freq.into());
    }

    /// Indices whose frequencies fall within `[MIN_HZ, MAX_HZ]`
    ///
    /// Sliders bound to this range can never derive an invalid frequency.
    pub fn audible_range() -> RangeInclusive<f64> {
        hz_to_index(MIN_HZ)..=hz_to_index(MAX_HZ)
    }

    /// Nearest equal-tempered note name, with the cents offset when off-pitch
    /// e.g. "A4", "C#5 +12c", "G2 -48c"
    pub fn note_name(&self) -> String {
        let nearest = self.index.round();
        let cents = ((self.index - nearest) * 100.0).round() as i32;

        let nearest = nearest as i64;
        let name = NOTE_NAMES[nearest.rem_euclid(12) as usize];
        let octave = nearest.div_euclid(12) - 1;

        if cents == 0 {
            format!("{}{}", name, octave)
        } else {
            format!("{}{} {:+}c", name, octave, cents)
        }
    }
}

impl Default for NoteIndex {
    fn default() -> Self {
        Self { index: A4_INDEX }
    }
}

impl From<Frequency> for NoteIndex {
    fn from(freq: Frequency) -> Self {
        Self::from_frequency(freq)
    }
}

/// Pull values that only miss a bound by rounding error onto the bound
fn snap_to_bounds(hz: f64) -> f64 {
    for bound in [MIN_HZ, MAX_HZ] {
        if ((hz - bound) / bound).abs() <= BOUND_SNAP {
            return bound;
        }
    }
    hz
}
