use crate::types::frequency::Frequency;
use crate::types::waveform::Waveform;

/// Oscillator with phase accumulation
/// Supports multiple waveforms: sine, square, sawtooth, triangle
pub struct Oscillator {
    /// Current phase position (0.0 to 1.0)
    phase: f32,
    /// Phase increment per sample (frequency / sample_rate)
    phase_delta: f32,
    /// Current frequency in Hz
    frequency: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    waveform: Waveform,
}

impl Oscillator {
    /// Create a new oscillator at the given frequency
    pub fn new(sample_rate: f32, frequency: Frequency) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_delta: 0.0,
            frequency: frequency.hz() as f32,
            sample_rate,
            waveform: Waveform::Sine,
        };
        osc.update_phase_delta();
        osc
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set the oscillator frequency, keeping the current phase
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency.hz() as f32;
        self.update_phase_delta();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Update phase delta based on current frequency
    fn update_phase_delta(&mut self) {
        self.phase_delta = self.frequency / self.sample_rate;
    }

    /// Generate next sample and advance phase
    pub fn next_sample(&mut self) -> f32 {
        let output = self.waveform.generate(self.phase);

        // Advance phase and wrap around
        self.phase += self.phase_delta;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        output
    }
}
