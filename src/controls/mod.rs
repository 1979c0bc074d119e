pub mod app;
pub mod command;
pub mod frequency_input;

pub use app::{App, Feedback};
pub use command::Command;
pub use frequency_input::FrequencyInput;
