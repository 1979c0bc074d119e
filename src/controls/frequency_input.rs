use std::ops::RangeInclusive;
use tracing::debug;

use crate::types::error::NoteError;
use crate::types::frequency::Frequency;
use crate::types::note::NoteIndex;

/// Paired text field and pitch slider editing one frequency
///
/// Text edits are parsed and, when valid, move the slider. Slider moves
/// derive a frequency and rewrite the text. Invalid text leaves the slider
/// where it was and records the diagnostic as validation text.
#[derive(Debug, Clone)]
pub struct FrequencyInput {
    slider: NoteIndex,
    slider_range: RangeInclusive<f64>,
    text: String,
    validation: Option<String>,
}

impl FrequencyInput {
    pub fn new(initial: Frequency) -> Self {
        Self {
            slider: NoteIndex::from_frequency(initial),
            slider_range: NoteIndex::audible_range(),
            text: initial.to_string(),
            validation: None,
        }
    }

    /// Handle an edit of the text field
    pub fn on_text(&mut self, text: &str) -> Result<Frequency, NoteError> {
        debug!(text, "frequency text input");
        self.text = text.to_string();

        match Frequency::parse(text) {
            Ok(freq) => {
                self.validation = None;
                self.slider.set_frequency(freq);
                Ok(freq)
            }
            Err(err) => {
                self.validation = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Handle a slider move to `index`, clamped to the audible range
    pub fn on_slider(&mut self, index: f64) -> Result<Frequency, NoteError> {
        debug!(index, "frequency slider input");
        let index = index.clamp(*self.slider_range.start(), *self.slider_range.end());
        self.slider.set_index(index);

        let freq = self.slider.frequency()?;
        self.text = freq.to_string();
        self.validation = None;
        Ok(freq)
    }

    /// Move the slider by a number of semitones
    pub fn nudge(&mut self, semitones: f64) -> Result<Frequency, NoteError> {
        self.on_slider(self.slider.index() + semitones)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Diagnostic for the last text edit, if it was rejected
    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn slider(&self) -> &NoteIndex {
        &self.slider
    }

    pub fn slider_range(&self) -> &RangeInclusive<f64> {
        &self.slider_range
    }
}

impl Default for FrequencyInput {
    fn default() -> Self {
        Self::new(Frequency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_moves_slider() {
        let mut input = FrequencyInput::default();
        let freq = input.on_text("880 Hz").unwrap();

        assert_eq!(freq.hz(), 880.0);
        assert!((input.slider().index() - 81.0).abs() < 1e-9);
        assert_eq!(input.text(), "880 Hz");
        assert!(input.validation().is_none());
    }

    #[test]
    fn test_invalid_text_keeps_slider() {
        let mut input = FrequencyInput::default();
        let err = input.on_text("abc").unwrap_err();

        assert!(err.is_parse());
        assert_eq!(input.slider().index(), 69.0);
        assert_eq!(input.text(), "abc");
        assert_eq!(input.validation(), Some(err.to_string().as_str()));

        // A later valid edit clears the diagnostic
        input.on_text("1k").unwrap();
        assert!(input.validation().is_none());
    }

    #[test]
    fn test_out_of_range_text_is_validation_feedback() {
        let mut input = FrequencyInput::default();
        assert!(input.on_text("5hz").unwrap_err().is_range());
        assert_eq!(
            input.validation(),
            Some("Frequency must be between 10 Hz and 20000 Hz. Got 5.")
        );
    }

    #[test]
    fn test_slider_rewrites_text() {
        let mut input = FrequencyInput::default();
        let freq = input.on_slider(81.0).unwrap();

        assert!((freq.hz() - 880.0).abs() < 1e-9);
        assert_eq!(input.text(), "880 Hz");
    }

    #[test]
    fn test_slider_clamps_to_audible_range() {
        let mut input = FrequencyInput::default();
        assert_eq!(input.on_slider(-50.0).unwrap(), Frequency::min_audible());
        assert_eq!(input.on_slider(500.0).unwrap(), Frequency::max_audible());
        assert_eq!(input.text(), "20,000 Hz");
    }

    #[test]
    fn test_nudge_by_octave() {
        let mut input = FrequencyInput::new(Frequency::new(220.0).unwrap());
        let freq = input.nudge(12.0).unwrap();
        assert!((freq.hz() - 440.0).abs() < 1e-9);

        let freq = input.nudge(-24.0).unwrap();
        assert!((freq.hz() - 110.0).abs() < 1e-9);
    }
}
