//! Voxstage demo binary
//!
//! Captures microphone audio with cpal, pushes it into the engine and
//! prints transcript events until Enter is pressed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use voxstage::{EngineConfig, EventKind, SpeechEngine};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Vosk model directory
    #[arg(short, long)]
    model: String,

    /// Audio input device index
    #[arg(short, long)]
    device: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🎤 Voxstage v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::default();
    let sample_rate = config.sample_rate;
    let engine = Arc::new(SpeechEngine::new(config));

    engine.on_result(|event| match event.kind {
        EventKind::Partial => println!("  … {}", event.text),
        EventKind::Final => println!("▶ {}", event.text),
    });

    engine.init().context("engine init failed")?;
    engine.load_model(&args.model).context("model load failed")?;

    // Capture stream stays alive for as long as this binding does
    let _stream = start_capture(Arc::clone(&engine), sample_rate, args.device)?;

    engine.start_recognition().context("could not start recognition")?;
    info!("✅ Listening - press Enter to stop");

    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);

    engine.stop_recognition();
    engine.shutdown();
    Ok(())
}

/// Start 16 kHz mono i16 capture feeding the engine's staging buffer
fn start_capture(
    engine: Arc<SpeechEngine>,
    sample_rate: u32,
    device_index: Option<usize>,
) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    info!("Available audio input devices:");
    for (i, device) in host.input_devices()?.enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let marker = if device_index == Some(i) { "*" } else { " " };
        info!("  {} [{}] {}", marker, i, name);
    }

    let device = if let Some(idx) = device_index {
        host.input_devices()?
            .nth(idx)
            .context("Device index out of range")?
    } else {
        host.default_input_device()
            .context("No default input device")?
    };

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    info!("Using audio device: {}", device_name);

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let stream = device.build_input_stream(
        &config,
        move |data: &[i16], _: &cpal::InputCallbackInfo| {
            engine.push_audio(data);
        },
        |err| {
            warn!("Audio stream error: {}", err);
        },
        None,
    )?;

    stream.play()?;
    Ok(stream)
}
