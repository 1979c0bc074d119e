use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::audio::gain::MAX_VOLUME;
use crate::audio::output::SinkId;
use crate::types::frequency::Frequency;
use crate::types::waveform::Waveform;

/// Top-level configuration structure
///
/// ```yaml
/// device: default        # default, mute, or an output name / index
/// tone:
///   frequency: 1.5 kHz   # same grammar as the frequency field
///   waveform: square
///   volume: 40
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToneConfig {
    #[serde(default)]
    pub device: SinkId,

    #[serde(default)]
    pub tone: ToneSettings,
}

impl ToneConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ToneConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tone.validate().context("Invalid tone settings")
    }
}

/// Initial tone settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToneSettings {
    #[serde(default)]
    pub frequency: Frequency,

    #[serde(default)]
    pub waveform: Waveform,

    #[serde(default = "default_volume")]
    pub volume: u8,
}

impl ToneSettings {
    pub fn validate(&self) -> Result<()> {
        if self.volume > MAX_VOLUME {
            return Err(anyhow!("Volume must be between 0 and {}", MAX_VOLUME));
        }
        Ok(())
    }
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            frequency: Frequency::default(),
            waveform: Waveform::default(),
            volume: default_volume(),
        }
    }
}

fn default_volume() -> u8 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ToneConfig::from_yaml("{}").unwrap();
        assert_eq!(config.device, SinkId::Default);
        assert_eq!(config.tone.frequency, Frequency::default());
        assert_eq!(config.tone.waveform, Waveform::Sine);
        assert_eq!(config.tone.volume, 50);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
device: mute
tone:
  frequency: 1.5 kHz
  waveform: square
  volume: 40
"#;
        let config = ToneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.device, SinkId::Mute);
        assert_eq!(config.tone.frequency.hz(), 1500.0);
        assert_eq!(config.tone.waveform, Waveform::Square);
        assert_eq!(config.tone.volume, 40);
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        let err = ToneConfig::from_yaml("tone:\n  frequency: 5 Hz\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Frequency must be between"));
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let err = ToneConfig::from_yaml("tone:\n  volume: 150\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Volume must be between 0 and 100"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ToneConfig::load("/nonexistent/tonegen.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
