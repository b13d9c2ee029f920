//! Bubble Pop entry point
//!
//! Loads settings, labels and the pop sound, then runs the frame loop
//! headlessly. `--demo` lets the autopilot pop bubbles until the field is clear.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bubble_pop::{QualityPreset, Settings};
use bubble_pop::audio::AudioManager;
use bubble_pop::driver::{DriverContext, FrameDriver};
use bubble_pop::loader::{FileSource, StaticSource, TextSource};
use bubble_pop::platform::{AutoPilot, EventSource, ScriptedEvents, SystemClock};
use bubble_pop::renderer::{MeshRenderer, RenderOptions, vertex};

#[derive(Parser, Debug)]
#[command(name = "bubble-pop", about = "Drifting text bubbles you can click to pop")]
struct Args {
    /// Labels to load (.txt: one per line, .csv: first column)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Settings JSON (defaults are used if missing)
    #[arg(short, long, default_value = "bubble-pop.json")]
    settings: PathBuf,

    /// Pop sound (WAV)
    #[arg(long, default_value = "resources/pop.wav")]
    sound: PathBuf,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Let the autopilot click bubbles
    #[arg(long)]
    demo: bool,

    /// Seconds between autopilot clicks
    #[arg(long, default_value_t = 0.4)]
    demo_interval: f32,

    /// Quality preset override (low, medium, high)
    #[arg(long)]
    quality: Option<String>,

    /// Write the effective settings to the settings path and exit
    #[arg(long)]
    write_settings: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Bubble Pop starting...");

    let mut settings = Settings::load(&args.settings);
    if let Some(name) = &args.quality {
        match QualityPreset::from_name(name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown quality '{name}', keeping {}", settings.quality.as_str()),
        }
    }
    if args.write_settings {
        settings
            .save(&args.settings)
            .with_context(|| format!("saving {}", args.settings.display()))?;
        return Ok(());
    }

    let texts: Box<dyn TextSource> = match &args.input {
        Some(path) => Box::new(FileSource::new(path.clone())),
        None => Box::new(StaticSource::default()),
    };

    let mut audio = AudioManager::load_pop(&args.sound);
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Seed {seed}");

    let options = RenderOptions::from_settings(&settings);
    let ctx = DriverContext::new(settings, texts, audio, seed);
    log::info!("{} bubbles on screen", ctx.manager.len());

    let events: Box<dyn EventSource> = if args.demo {
        Box::new(AutoPilot::new(seed, args.demo_interval))
    } else {
        Box::new(ScriptedEvents::default())
    };

    let mut driver = FrameDriver::new(ctx, events, MeshRenderer::new(options), SystemClock::new());
    let stats = driver.run_for(args.frames);

    let mesh = driver.renderer().last();
    log::info!(
        "Done: {} frames, {} popped, {} removed, {} left \
         ({} vertices / {} bytes, {} labels in last frame)",
        stats.frames,
        stats.pops,
        stats.pruned,
        driver.context().manager.len(),
        mesh.vertices.len(),
        vertex::as_bytes(&mesh.vertices).len(),
        mesh.labels.len()
    );
    Ok(())
}
