use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::engine::ToneEngine;
use super::gain::volume_to_gain;
use super::output::{open_device, SinkId};
use super::parameters::ToneParameters;
use crate::types::events::ToneEvent;
use crate::types::frequency::Frequency;
use crate::types::waveform::Waveform;

/// Whether the tone is running, and where
enum Playback {
    Paused,
    /// Playing into the mute sink; no device is opened
    Silent,
    Streaming { _stream: cpal::Stream },
}

/// Playback state owned by the control side
///
/// Holds the latest valid frequency and the open output stream, if any.
/// Pausing drops the stream; playing again opens a fresh one that starts at
/// the latest frequency.
pub struct ToneSession {
    sink: SinkId,
    parameters: Arc<ToneParameters>,
    event_tx: Sender<ToneEvent>,
    event_rx: Receiver<ToneEvent>,
    latest: Frequency,
    playback: Playback,
}

impl ToneSession {
    pub fn new(sink: SinkId, frequency: Frequency, waveform: Waveform, volume: u8) -> Self {
        let (event_tx, event_rx) = unbounded();
        let parameters = Arc::new(ToneParameters::new(
            volume_to_gain(volume),
            waveform,
            sink.is_mute(),
        ));

        Self {
            sink,
            parameters,
            event_tx,
            event_rx,
            latest: frequency,
            playback: Playback::Paused,
        }
    }

    pub fn is_playing(&self) -> bool {
        !matches!(self.playback, Playback::Paused)
    }

    /// Latest successfully produced frequency
    pub fn frequency(&self) -> Frequency {
        self.latest
    }

    pub fn sink(&self) -> &SinkId {
        &self.sink
    }

    pub fn parameters(&self) -> &Arc<ToneParameters> {
        &self.parameters
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.latest = frequency;
        if matches!(self.playback, Playback::Streaming { .. }) {
            // Receiver lives as long as the session, so this cannot fail
            let _ = self.event_tx.send(ToneEvent::frequency_changed(frequency));
        }
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.parameters.set_waveform(waveform);
    }

    pub fn set_volume(&self, volume: u8) {
        self.parameters.set_gain(volume_to_gain(volume));
    }

    /// Start the tone, opening the output stream if needed
    pub fn play(&mut self) -> Result<()> {
        if self.is_playing() {
            return Ok(());
        }

        if self.sink.is_mute() {
            info!(frequency = %self.latest, "playing into mute sink");
            self.playback = Playback::Silent;
            return Ok(());
        }

        // Stale events from a previous stream
        while self.event_rx.try_recv().is_ok() {}

        let device = open_device(&self.sink)?;
        let stream = start_tone_stream(&device, self.engine_parts())
            .with_context(|| format!("Failed to start audio on '{}'", self.sink))?;

        info!(frequency = %self.latest, sink = %self.sink, "playing");
        self.playback = Playback::Streaming { _stream: stream };
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.playback = Playback::Paused;
            info!("paused");
        }
    }

    /// Flip between playing and paused, returning whether it now plays
    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_playing() {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.is_playing())
    }

    fn engine_parts(&self) -> EngineParts {
        EngineParts {
            frequency: self.latest,
            parameters: self.parameters.clone(),
            event_rx: self.event_rx.clone(),
        }
    }
}

/// Everything the audio thread needs to build its engine
struct EngineParts {
    frequency: Frequency,
    parameters: Arc<ToneParameters>,
    event_rx: Receiver<ToneEvent>,
}

/// Open an output stream on the device's default config
fn start_tone_stream(device: &cpal::Device, parts: EngineParts) -> Result<cpal::Stream> {
    let audio_config = device.default_output_config()?;
    let num_channels = audio_config.channels() as usize;
    debug!(channels = num_channels, format = ?audio_config.sample_format(), "output config");

    match audio_config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(device, &audio_config.into(), parts, num_channels)
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(device, &audio_config.into(), parts, num_channels)
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(device, &audio_config.into(), parts, num_channels)
        }
        other => Err(anyhow!("Unsupported sample format: {:?}", other)),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    parts: EngineParts,
    num_channels: usize,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let sample_rate = config.sample_rate as f32;
    let mut engine = ToneEngine::new(sample_rate, parts.frequency, parts.parameters, parts.event_rx);

    // Pre-allocate buffer for processing
    let mut temp_buffer = vec![0.0f32; 512 * num_channels];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if temp_buffer.len() < data.len() {
                temp_buffer.resize(data.len(), 0.0);
            }

            let buffer = &mut temp_buffer[..data.len()];
            engine.process(buffer, num_channels);

            for (out, sample) in data.iter_mut().zip(buffer.iter()) {
                *out = T::from_sample(*sample);
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_new_session_is_paused() {
        let session = ToneSession::new(SinkId::Default, Frequency::default(), Waveform::Sine, 50);
        assert!(!session.is_playing());
        assert_eq!(session.frequency(), Frequency::default());
        assert!((session.parameters().effective_gain() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_mute_sink_silences_parameters() {
        let session = ToneSession::new(SinkId::Mute, Frequency::default(), Waveform::Sine, 100);
        assert_eq!(session.parameters().effective_gain(), 0.0);
    }

    #[test]
    fn test_paused_frequency_change_is_remembered() {
        let mut session = ToneSession::new(SinkId::Default, Frequency::default(), Waveform::Sine, 50);
        let freq = Frequency::new(1000.0).unwrap();
        session.set_frequency(freq);

        assert_eq!(session.frequency(), freq);
        // Nothing queued while there is no engine to consume it
        assert!(session.event_rx.is_empty());
    }

    #[test]
    fn test_waveform_and_volume_reach_parameters() {
        let session = ToneSession::new(SinkId::Default, Frequency::default(), Waveform::Sine, 50);
        session.set_waveform(Waveform::Triangle);
        session.set_volume(100);

        let params = session.parameters();
        assert_eq!(params.waveform(), Waveform::Triangle);
        assert_eq!(params.gain.load(Ordering::Relaxed), 1.0);
    }

    #[test]
    fn test_mute_sink_plays_without_device() {
        let mut session = ToneSession::new(SinkId::Mute, Frequency::default(), Waveform::Sine, 50);
        session.play().unwrap();
        assert!(session.is_playing());

        session.set_frequency(Frequency::new(880.0).unwrap());
        assert_eq!(session.frequency().hz(), 880.0);
        assert!(session.event_rx.is_empty());

        assert!(!session.toggle().unwrap());
        assert!(session.toggle().unwrap());
    }

    #[test]
    fn test_pause_when_paused_is_noop() {
        let mut session = ToneSession::new(SinkId::Default, Frequency::default(), Waveform::Sine, 50);
        session.pause();
        assert!(!session.is_playing());
    }
}
