use thiserror::Error;

use crate::types::waveform::Waveform;

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Free text for the frequency field
    Frequency(String),
    /// Move the slider by this many semitones
    Nudge(f64),
    /// Put the slider at an absolute index
    Index(f64),
    /// Free text for the volume field
    Volume(String),
    Wave(Waveform),
    Play,
    Pause,
    Toggle,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("'{command}' needs a value, e.g. {example}")]
    MissingArgument {
        command: &'static str,
        example: &'static str,
    },

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("{0}")]
    InvalidWaveform(String),
}

pub const HELP: &str = "\
Commands:
  <frequency>        set the frequency, e.g. 440, 1.5 kHz, 12,000 Hz
  up [n] / + [n]     raise by n semitones (default 1)
  down [n] / - [n]   lower by n semitones (default 1)
  index <n>          put the slider at note index n (69 = A4)
  vol <0-100>        set the volume
  wave <name>        sine, square, sawtooth or triangle
  play / pause       start or stop the tone (empty line toggles)
  status             show the current settings
  help               show this text
  quit               exit";

impl Command {
    /// Parse one input line
    ///
    /// Anything that is not a known command word is treated as frequency
    /// text, so typos surface the frequency grammar diagnostic.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" | "toggle" => Command::Toggle,
            "play" => Command::Play,
            "pause" | "stop" => Command::Pause,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "up" | "+" => Command::Nudge(parse_steps(rest)?),
            "down" | "-" => Command::Nudge(-parse_steps(rest)?),
            "index" => Command::Index(parse_number(required(rest, "index", "index 60")?)?),
            "vol" | "volume" => Command::Volume(rest.to_string()),
            "wave" | "waveform" => Command::Wave(
                required(rest, "wave", "wave square")?
                    .parse()
                    .map_err(CommandError::InvalidWaveform)?,
            ),
            _ => Command::Frequency(line.to_string()),
        };

        Ok(command)
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    example: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, example })
    } else {
        Ok(rest)
    }
}

fn parse_number(text: &str) -> Result<f64, CommandError> {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(text.to_string()))
}

fn parse_steps(rest: &str) -> Result<f64, CommandError> {
    if rest.is_empty() {
        Ok(1.0)
    } else {
        parse_number(rest)
    }
}
