//! Tone generator built around a validated frequency model.
//!
//! [`Frequency`] parses and validates user text, [`NoteIndex`] maps it onto a
//! linear pitch axis for slider-style control, and the `audio` module plays
//! the result through cpal.

pub mod audio;
pub mod config;
pub mod controls;
pub mod types;

pub use types::{Frequency, NoteError, NoteIndex, Waveform};
