use crossbeam_channel::Receiver;
use std::sync::Arc;

use super::{oscillator::Oscillator, parameters::ToneParameters};
use crate::types::events::ToneEvent;
use crate::types::frequency::Frequency;

/// Tone generation engine
/// Runs in real-time audio thread - must be lock-free and allocation-free
pub struct ToneEngine {
    oscillator: Oscillator,
    parameters: Arc<ToneParameters>,
    event_rx: Receiver<ToneEvent>,
}

impl ToneEngine {
    pub fn new(
        sample_rate: f32,
        frequency: Frequency,
        parameters: Arc<ToneParameters>,
        event_rx: Receiver<ToneEvent>,
    ) -> Self {
        Self {
            oscillator: Oscillator::new(sample_rate, frequency),
            parameters,
            event_rx,
        }
    }

    /// Frequency the oscillator is currently running at
    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    /// Fill an interleaved buffer, writing the same sample to every channel
    pub fn process(&mut self, output: &mut [f32], num_channels: usize) {
        // Process all pending control events (non-blocking)
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                ToneEvent::FrequencyChanged(frequency) => {
                    self.oscillator.set_frequency(frequency);
                }
            }
        }

        let gain = self.parameters.effective_gain();
        self.oscillator.set_waveform(self.parameters.waveform());

        for frame in output.chunks_mut(num_channels.max(1)) {
            let sample = self.oscillator.next_sample() * gain;
            frame.fill(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::waveform::Waveform;
    use crossbeam_channel::unbounded;

    fn engine(params: Arc<ToneParameters>) -> (ToneEngine, crossbeam_channel::Sender<ToneEvent>) {
        let (tx, rx) = unbounded();
        (ToneEngine::new(44100.0, Frequency::default(), params, rx), tx)
    }

    #[test]
    fn test_output_bounded_by_gain() {
        let params = Arc::new(ToneParameters::new(0.5, Waveform::Sawtooth, false));
        let (mut engine, _tx) = engine(params);

        let mut buffer = vec![0.0f32; 1024];
        engine.process(&mut buffer, 2);
        assert!(buffer.iter().all(|s| s.abs() <= 0.5));
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_channels_carry_same_sample() {
        let (mut engine, _tx) = engine(Arc::new(ToneParameters::default()));

        let mut buffer = vec![0.0f32; 300];
        engine.process(&mut buffer, 3);
        for frame in buffer.chunks(3) {
            assert_eq!(frame[0], frame[1]);
            assert_eq!(frame[1], frame[2]);
        }
    }

    #[test]
    fn test_frequency_event_applied() {
        let (mut engine, tx) = engine(Arc::new(ToneParameters::default()));
        tx.send(ToneEvent::frequency_changed(Frequency::new(1000.0).unwrap()))
            .unwrap();

        let mut buffer = vec![0.0f32; 16];
        engine.process(&mut buffer, 1);
        assert_eq!(engine.frequency(), 1000.0);
    }

    #[test]
    fn test_muted_is_silent() {
        let params = Arc::new(ToneParameters::new(1.0, Waveform::Square, true));
        let (mut engine, _tx) = engine(params);

        let mut buffer = vec![1.0f32; 64];
        engine.process(&mut buffer, 2);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }
}
