use thiserror::Error;

/// Loudest volume setting
pub const MAX_VOLUME: u8 = 100;

/// Failures of the volume text field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolumeError {
    #[error("Failed to parse volume to number: {0}")]
    Parse(String),

    #[error("Volume out of range: {0}. Should be [0, 100].")]
    Range(i64),
}

/// Parse a volume setting in `[0, 100]`; empty text means silent
pub fn parse_volume(text: &str) -> Result<u8, VolumeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let value: i64 = text
        .trim_end_matches('%')
        .trim_end()
        .parse()
        .map_err(|_| VolumeError::Parse(text.to_string()))?;

    if !(0..=MAX_VOLUME as i64).contains(&value) {
        return Err(VolumeError::Range(value));
    }
    Ok(value as u8)
}

/// Map a volume setting to linear gain
/// Squaring approximates the ear's logarithmic loudness response
pub fn volume_to_gain(volume: u8) -> f32 {
    let normalized = volume.min(MAX_VOLUME) as f32 / MAX_VOLUME as f32;
    normalized * normalized
}
