pub mod error;
pub mod events;
pub mod frequency;
pub mod note;
pub mod waveform;

pub use error::NoteError;
pub use frequency::{Frequency, DEFAULT_HZ, MAX_HZ, MIN_HZ};
pub use note::NoteIndex;
pub use waveform::Waveform;
