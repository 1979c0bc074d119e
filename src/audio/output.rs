use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Where the tone is sent
///
/// `Default` is whatever output the OS hands us, `Mute` keeps the stream
/// running but renders silence, `Device` selects an output by name or index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SinkId {
    #[default]
    Default,
    Mute,
    Device(String),
}

impl SinkId {
    /// Normalize a user-supplied sink string
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.to_lowercase().as_str() {
            "" | "default" => SinkId::Default,
            "none" | "mute" => SinkId::Mute,
            _ => SinkId::Device(text.to_string()),
        }
    }

    pub fn is_mute(&self) -> bool {
        matches!(self, SinkId::Mute)
    }

    /// Check a named device against the available outputs
    ///
    /// A device that has disappeared falls back to the default output.
    pub fn resolve(self, available: &[String]) -> Self {
        match self {
            SinkId::Device(ref search) => match find_audio_device(available, search) {
                Ok(index) => {
                    debug!(device = %available[index], "resolved output device");
                    SinkId::Device(available[index].clone())
                }
                Err(err) => {
                    warn!(%err, "selected output device is missing, falling back to default");
                    SinkId::Default
                }
            },
            other => other,
        }
    }
}

impl From<String> for SinkId {
    fn from(text: String) -> Self {
        SinkId::parse(&text)
    }
}

impl From<SinkId> for String {
    fn from(sink: SinkId) -> Self {
        sink.to_string()
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkId::Default => f.write_str("default"),
            SinkId::Mute => f.write_str("mute"),
            SinkId::Device(name) => f.write_str(name),
        }
    }
}

/// List available audio output devices
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let mut devices: Vec<String> = host
        .output_devices()?
        .filter_map(|device| device.description().ok().map(|desc| desc.name().to_string()))
        .collect();

    // The default device is not always part of the enumeration
    if let Some(default_device) = host.default_output_device() {
        if let Ok(default_desc) = default_device.description() {
            let default_name = default_desc.name().to_string();
            if !devices.contains(&default_name) {
                devices.push(default_name);
            }
        }
    }

    Ok(devices)
}

/// Find audio device index by name or index string
pub fn find_audio_device(devices: &[String], search: &str) -> Result<usize> {
    // Try to parse as index first
    if let Ok(index) = search.parse::<usize>() {
        if index < devices.len() {
            return Ok(index);
        }
        return Err(anyhow!(
            "Audio device index {} out of range ({} devices available)",
            index,
            devices.len()
        ));
    }

    // Exact name wins over a substring match
    if let Some(index) = devices.iter().position(|d| d == search) {
        return Ok(index);
    }

    // Search by name (case-insensitive substring match)
    let search_lower = search.to_lowercase();
    devices
        .iter()
        .position(|device| device.to_lowercase().contains(&search_lower))
        .ok_or_else(|| anyhow!("Audio device '{}' not found", search))
}

/// Resolve a configured sink, enumerating outputs only for a named device
pub fn resolve_sink(sink: SinkId) -> Result<SinkId> {
    match sink {
        SinkId::Device(_) => Ok(sink.resolve(&list_output_devices()?)),
        other => Ok(other),
    }
}

/// Open the cpal device for a resolved sink
///
/// The mute sink has no device.
pub fn open_device(sink: &SinkId) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match sink {
        SinkId::Mute => Err(anyhow!("The mute sink has no audio device")),
        SinkId::Default => host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default audio output device")),
        SinkId::Device(name) => host
            .output_devices()?
            .find(|device| {
                device
                    .description()
                    .map(|desc| desc.name() == name.as_str())
                    .unwrap_or(false)
            })
            .ok_or_else(|| anyhow!("Audio device '{}' not available", name)),
    }
}
