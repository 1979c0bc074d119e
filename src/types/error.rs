use thiserror::Error;

use super::frequency::{MAX_HZ, MIN_HZ};

/// Failures of the frequency value model
///
/// Both variants are validation feedback for the user: the caller shows the
/// message next to the offending input and keeps its previous state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoteError {
    /// Input text does not match the frequency grammar
    #[error("Must be a number ending in Hz or KHz. Got \"{0}\".")]
    Parse(String),

    /// A parsed or derived value lies outside the audible range
    #[error("Frequency must be between {} Hz and {} Hz. Got {value}.", MIN_HZ, MAX_HZ)]
    Range { value: f64 },
}

impl NoteError {
    pub fn is_parse(&self) -> bool {
        matches!(self, NoteError::Parse(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, NoteError::Range { .. })
    }
}
