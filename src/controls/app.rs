use anyhow::Result;
use tracing::debug;

use super::command::{Command, HELP};
use super::frequency_input::FrequencyInput;
use crate::audio::gain::parse_volume;
use crate::audio::session::ToneSession;
use crate::types::waveform::Waveform;

/// What the front end should show after a line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Settings changed or were queried; show the status line
    Status(String),
    /// Input was rejected; show the diagnostic and keep the previous state
    Invalid(String),
    Help(&'static str),
    Quit,
}

/// Interactive application state
/// Routes each command to the frequency input and the playback session
pub struct App {
    pub input: FrequencyInput,
    pub waveform: Waveform,
    pub volume: u8,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: &ToneSession, waveform: Waveform, volume: u8) -> Self {
        Self {
            input: FrequencyInput::new(session.frequency()),
            waveform,
            volume,
            should_quit: false,
        }
    }

    /// Parse and apply one line of input
    ///
    /// Validation failures come back as `Feedback::Invalid`; only audio
    /// backend failures are returned as errors.
    pub fn handle_line(&mut self, line: &str, session: &mut ToneSession) -> Result<Feedback> {
        match Command::parse(line) {
            Ok(command) => self.apply(command, session),
            Err(err) => Ok(Feedback::Invalid(err.to_string())),
        }
    }

    pub fn apply(&mut self, command: Command, session: &mut ToneSession) -> Result<Feedback> {
        debug!(?command, "apply");

        match command {
            Command::Frequency(text) => match self.input.on_text(&text) {
                Ok(freq) => session.set_frequency(freq),
                Err(err) => return Ok(Feedback::Invalid(err.to_string())),
            },
            Command::Nudge(semitones) => match self.input.nudge(semitones) {
                Ok(freq) => session.set_frequency(freq),
                Err(err) => return Ok(Feedback::Invalid(err.to_string())),
            },
            Command::Index(index) => match self.input.on_slider(index) {
                Ok(freq) => session.set_frequency(freq),
                Err(err) => return Ok(Feedback::Invalid(err.to_string())),
            },
            Command::Volume(text) => match parse_volume(&text) {
                Ok(volume) => {
                    self.volume = volume;
                    session.set_volume(volume);
                }
                Err(err) => return Ok(Feedback::Invalid(err.to_string())),
            },
            Command::Wave(waveform) => {
                self.waveform = waveform;
                session.set_waveform(waveform);
            }
            Command::Play => session.play()?,
            Command::Pause => session.pause(),
            Command::Toggle => {
                session.toggle()?;
            }
            Command::Status => {}
            Command::Help => return Ok(Feedback::Help(HELP)),
            Command::Quit => {
                session.pause();
                self.should_quit = true;
                return Ok(Feedback::Quit);
            }
        }

        Ok(Feedback::Status(self.status_line(session)))
    }

    /// One-line summary of the current settings
    pub fn status_line(&self, session: &ToneSession) -> String {
        let state = if session.is_playing() { "playing" } else { "paused" };
        format!(
            "[{}] {} ({}) {} vol {} -> {}",
            state,
            session.frequency(),
            self.input.slider().note_name(),
            self.waveform,
            self.volume,
            session.sink(),
        )
    }
}
