//! talkbridge CLI
//!
//! Command-line interface for driving the assistant service: inspect the
//! routing plan, run chat turns, transcribe WAV files, and synthesize
//! speech.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_speech::wav;
use application::{AssistantService, ConfigSnapshot, SettingsDocument};

/// talkbridge CLI
#[derive(Parser)]
#[command(name = "talkbridge-cli")]
#[command(author, version, about = "talkbridge AI capability router CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the settings document
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which backend each capability routes to
    Routes,

    /// Run one chat turn
    Chat {
        /// Message to send
        message: String,
    },

    /// Transcribe a 16-bit PCM WAV file
    Transcribe {
        /// WAV file to transcribe
        file: PathBuf,
    },

    /// Synthesize text into a WAV file
    Speak {
        /// Text to synthesize
        text: String,

        /// Output WAV path
        #[arg(short, long, default_value = "speech.wav")]
        output: PathBuf,
    },

    /// List selectable personas
    Personas,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Load and resolve the settings document; a missing file means defaults
fn load_snapshot(path: &Path) -> anyhow::Result<ConfigSnapshot> {
    let document = match std::fs::read_to_string(path) {
        Ok(text) => SettingsDocument::from_toml(&text)
            .with_context(|| format!("Invalid settings document at {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => SettingsDocument::default(),
        Err(e) => {
            return Err(e).with_context(|| format!("Could not read {}", path.display()));
        },
    };
    Ok(ConfigSnapshot::from_document(&document))
}

async fn run(command: Commands, service: &AssistantService) -> anyhow::Result<()> {
    match command {
        Commands::Routes => {
            let plan = service.routing();
            println!("chat:           {}", plan.chat);
            println!("speech-to-text: {}", plan.stt);
            println!("text-to-speech: {}", plan.tts);
        },

        Commands::Chat { message } => {
            let reply = service.chat(&message).await?;
            println!("{reply}");
        },

        Commands::Transcribe { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Could not read {}", file.display()))?;
            let audio = wav::decode_wav(&bytes)?;
            let recognition = service.recognize(&audio).await?;
            if recognition.has_speech() {
                println!("{}", recognition.text());
            } else {
                println!("(no speech recognized)");
            }
        },

        Commands::Speak { text, output } => {
            let audio = service.synthesize(&text).await?;
            let bytes = wav::encode_wav(&audio)?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("Could not write {}", output.display()))?;
            println!(
                "Wrote {} ({} Hz, {}-bit, {} channel)",
                output.display(),
                audio.sample_rate,
                audio.bits_per_sample,
                audio.channels
            );
        },

        Commands::Personas => {
            let active = service.persona();
            for name in service.persona_names() {
                let marker = if name == active.name() { "*" } else { " " };
                println!("{marker} {name}");
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let snapshot = load_snapshot(&cli.config)?;
    let service = AssistantService::new(snapshot).await?;

    let result = run(cli.command, &service).await;

    // Always stop supervised processes, even when the command failed.
    service.shutdown().await;
    result
}
