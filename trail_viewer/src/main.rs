use anyhow::Context;
use clap::Parser;
use particle_trail::core_modules::color_range::ColorRange;
use particle_trail::pipeline::{TrackerConfig, TrackerContext, run};
use std::time::Duration;

mod args;
mod video;

use args::Args;
use video::{CaptureSource, SourceSpec, WindowDisplay};

const WINDOW_LABEL: &str = "Detecting particle trajectory";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- 1. Argument Parsing & Configuration ---
    let args = Args::parse();
    let config = TrackerConfig {
        color_range: ColorRange::new(args.lower, args.upper).context("invalid --lower/--upper")?,
        capacity: args.buffer as usize,
        frame_width: args.width,
        min_radius: args.min_radius,
        warmup: Duration::from_millis(args.warmup_ms),
        ..TrackerConfig::default()
    };
    let mut context = TrackerContext::new(config).context("invalid tracker configuration")?;

    // --- 2. Video I/O Initialization ---
    // The source must open before any window appears.
    let spec = match &args.video {
        Some(path) => SourceSpec::File(path),
        None => SourceSpec::Camera(args.camera),
    };
    let mut source = CaptureSource::open(spec).context("cannot start tracking")?;
    std::thread::sleep(context.config().warmup);
    let mut display = WindowDisplay::new(WINDOW_LABEL).context("cannot open display window")?;

    // --- 3. Main Processing Loop ---
    let summary = run(&mut context, &mut source, &mut display).context("tracking stopped")?;
    log::info!(
        "processed {} frames ({:?})",
        summary.frames_processed,
        summary.stop_reason
    );

    // --- 4. Trajectory Dump ---
    // Source and window are released when they go out of scope below.
    let trail = context.trail();
    println!("{}", trail.format_centroids());
    println!(" ");
    println!("{}", trail.format_timestamps());

    Ok(())
}
