use super::frequency::Frequency;

/// Events sent from the control thread to the audio thread
/// Must be simple and fast to construct/parse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneEvent {
    /// A new valid frequency was produced by the text field or the slider
    FrequencyChanged(Frequency),
}

impl ToneEvent {
    pub fn frequency_changed(frequency: Frequency) -> Self {
        ToneEvent::FrequencyChanged(frequency)
    }
}
