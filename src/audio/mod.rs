pub mod engine;
pub mod gain;
pub mod oscillator;
pub mod output;
pub mod parameters;
pub mod session;

pub use gain::{parse_volume, volume_to_gain, VolumeError};
pub use output::SinkId;
pub use session::ToneSession;
