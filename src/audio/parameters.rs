use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::types::waveform::Waveform;

/// Thread-safe parameter storage using atomic operations
/// Allows real-time audio thread to read parameters without blocking
pub struct ToneParameters {
    /// Output gain (0.0 to 1.0), already shaped by the volume curve
    pub gain: AtomicF32,
    /// Waveform stored as `Waveform::to_u8`
    pub waveform: AtomicU8,
    /// Render silence instead of the tone
    pub muted: AtomicBool,
}

impl ToneParameters {
    pub fn new(gain: f32, waveform: Waveform, muted: bool) -> Self {
        Self {
            gain: AtomicF32::new(gain),
            waveform: AtomicU8::new(waveform.to_u8()),
            muted: AtomicBool::new(muted),
        }
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain.store(gain.clamp(0.0, 1.0), Ordering::Relaxed);
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform.to_u8(), Ordering::Relaxed);
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Gain the audio thread should apply right now
    pub fn effective_gain(&self) -> f32 {
        if self.muted.load(Ordering::Relaxed) {
            0.0
        } else {
            self.gain.load(Ordering::Relaxed)
        }
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_u8(self.waveform.load(Ordering::Relaxed))
    }
}

impl Default for ToneParameters {
    fn default() -> Self {
        Self::new(0.25, Waveform::Sine, false) // volume 50
    }
}

/// Atomic f32 wrapper for lock-free parameter updates
pub struct AtomicF32 {
    storage: AtomicU32,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            storage: AtomicU32::new(value.to_bits()),
        }
    }

    pub fn load(&self, ordering: Ordering) -> f32 {
        f32::from_bits(self.storage.load(ordering))
    }

    pub fn store(&self, value: f32, ordering: Ordering) {
        self.storage.store(value.to_bits(), ordering);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f32_round_trip() {
        let value = AtomicF32::new(0.5);
        assert_eq!(value.load(Ordering::Relaxed), 0.5);
        value.store(0.125, Ordering::Relaxed);
        assert_eq!(value.load(Ordering::Relaxed), 0.125);
    }

    #[test]
    fn test_gain_is_clamped() {
        let params = ToneParameters::default();
        params.set_gain(1.5);
        assert_eq!(params.effective_gain(), 1.0);
        params.set_gain(-0.2);
        assert_eq!(params.effective_gain(), 0.0);
    }

    #[test]
    fn test_mute_silences_gain() {
        let params = ToneParameters::new(0.8, Waveform::Square, false);
        assert_eq!(params.effective_gain(), 0.8);
        params.set_muted(true);
        assert_eq!(params.effective_gain(), 0.0);
        assert_eq!(params.waveform(), Waveform::Square);
    }
}
