use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tonegen::audio::{output, parse_volume, SinkId, ToneSession};
use tonegen::config::ToneConfig;
use tonegen::controls::{App, Feedback};
use tonegen::types::{Frequency, NoteIndex, Waveform};

/// Tone generator with text and slider-style frequency control
#[derive(Parser, Debug)]
#[command(name = "tonegen")]
#[command(about = "Interactive tone generator", long_about = None)]
struct Args {
    /// Log every input event
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play a tone and adjust it from the prompt (default)
    Play(PlayArgs),

    /// Print frequency, note index and note name for a frequency or index
    Convert {
        /// Frequency text, e.g. "1.5 kHz"
        text: Vec<String>,

        /// Note index instead of frequency text (69 = A4)
        #[arg(short, long, conflicts_with = "text", allow_negative_numbers = true)]
        index: Option<f64>,
    },

    /// List available audio output devices and exit
    List,
}

#[derive(clap::Args, Debug, Default)]
struct PlayArgs {
    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting frequency, e.g. 440, "1.5 kHz"
    #[arg(short, long)]
    frequency: Option<Frequency>,

    /// sine, square, sawtooth or triangle
    #[arg(short, long)]
    waveform: Option<Waveform>,

    /// Volume from 0 to 100
    #[arg(long, value_parser = parse_volume)]
    volume: Option<u8>,

    /// Output device: default, mute, or a name / index from `list`
    #[arg(short, long)]
    device: Option<String>,

    /// Start playing immediately
    #[arg(long)]
    autoplay: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.mode.unwrap_or(Mode::Play(PlayArgs::default())) {
        Mode::Play(play) => run_play(play),
        Mode::Convert { text, index } => run_convert(&text.join(" "), index),
        Mode::List => run_list(),
    }
}

fn run_list() -> Result<()> {
    let devices = output::list_output_devices()?;
    println!("Available Audio Output Devices:");
    println!("  default");
    println!("  mute");
    for (i, device) in devices.iter().enumerate() {
        println!("  {}: {}", i, device);
    }
    Ok(())
}

fn run_convert(text: &str, index: Option<f64>) -> Result<()> {
    let (note, frequency) = match index {
        Some(index) => {
            let note = NoteIndex::new(index);
            (note, note.frequency()?)
        }
        None => {
            let frequency = Frequency::parse(text)?;
            (NoteIndex::from_frequency(frequency), frequency)
        }
    };

    println!("Frequency:  {}", frequency);
    println!("Note index: {:.2}", note.index());
    println!("Note:       {}", note.note_name());
    Ok(())
}

/// Run the interactive prompt until `quit` or end of input
fn run_play(args: PlayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ToneConfig::load(path)?,
        None => ToneConfig::default(),
    };

    // Command line flags override the file
    if let Some(frequency) = args.frequency {
        config.tone.frequency = frequency;
    }
    if let Some(waveform) = args.waveform {
        config.tone.waveform = waveform;
    }
    if let Some(volume) = args.volume {
        config.tone.volume = volume;
    }
    if let Some(device) = &args.device {
        config.device = SinkId::parse(device);
    }

    let sink = output::resolve_sink(config.device.clone())?;
    info!(sink = %sink, "selected output");

    let tone = &config.tone;
    let mut session = ToneSession::new(sink, tone.frequency, tone.waveform, tone.volume);
    let mut app = App::new(&session, tone.waveform, tone.volume);

    if args.autoplay {
        session.play()?;
    }

    println!("{}", app.status_line(&session));
    println!("Type a frequency, or 'help' for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;

        match app.handle_line(&line, &mut session) {
            Ok(Feedback::Status(status)) => println!("{}", status),
            Ok(Feedback::Invalid(message)) => println!("! {}", message),
            Ok(Feedback::Help(help)) => println!("{}", help),
            Ok(Feedback::Quit) => break,
            // Audio backend failure; the prompt stays usable
            Err(err) => error!("{:#}", err),
        }
        stdout.flush()?;
    }

    session.pause();
    Ok(())
}
