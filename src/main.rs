//! Squat analysis application: analyze a video or replay a recording.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use squat_analysis::{
    config::{Config, EXAMPLE_CONFIG},
    recording::Recording,
    session::{SessionSummary, SquatSession},
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file to analyze (requires the `video` feature)
    #[arg(short, long, conflicts_with = "replay")]
    video: Option<PathBuf>,

    /// Recorded observations (JSON) to replay instead of a video
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Show annotated frames in a window
    #[arg(short, long)]
    gui: bool,

    /// Seconds to skip at the start of the video
    #[arg(long)]
    setup_seconds: Option<f64>,

    /// Knee angle smoothing (none, moving_average:N, median:N, exponential:A)
    #[arg(short, long)]
    smoothing: Option<String>,

    /// Write the session summary as JSON
    #[arg(long)]
    dump_report: Option<PathBuf>,

    /// Save per-frame observations of the analyzed video as JSON
    #[arg(long, requires = "video")]
    record: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?
    } else {
        Config::default()
    };

    if args.gui {
        config.display.gui = true;
    }
    if let Some(seconds) = args.setup_seconds {
        config.video.setup_seconds = seconds;
    }
    if let Some(smoothing) = &args.smoothing {
        config.reps.smoothing.clone_from(smoothing);
    }
    Ok(config)
}

fn replay(path: &Path, config: &Config) -> Result<SessionSummary> {
    let recording = Recording::load(path).with_context(|| format!("Failed to load recording {}", path.display()))?;
    let mut session = SquatSession::new(config.session_config(recording.fps)?)?;
    Ok(recording.replay(&mut session))
}

#[cfg(feature = "video")]
fn analyze_video(path: &Path, config: Config, record: Option<&Path>) -> Result<SessionSummary> {
    use squat_analysis::app::{AppConfig, SquatApp};

    let mut app = SquatApp::new(AppConfig {
        video: path.to_path_buf(),
        config,
        record: record.is_some(),
    })?;
    let summary = app.run()?;

    if let (Some(out), Some(recording)) = (record, app.recording()) {
        recording.save(out)?;
        info!("Saved {} observations to {}", recording.len(), out.display());
    }
    Ok(summary)
}

#[cfg(not(feature = "video"))]
fn analyze_video(_path: &Path, _config: Config, _record: Option<&Path>) -> Result<SessionSummary> {
    bail!("Video analysis requires building with the `video` feature; use --replay for recordings")
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Squat Analysis");
    let config = load_config(&args)?;
    config.validate().context("Invalid configuration")?;

    let summary = match (&args.video, &args.replay) {
        (Some(video), None) => analyze_video(video, config, args.record.as_deref())?,
        (None, Some(recording)) => replay(recording, &config)?,
        _ => bail!("Pass either --video or --replay"),
    };

    println!("Reps: {:.1}", summary.reps);
    println!("Orientation: {}", summary.orientation);
    println!(
        "Frames: {} ({} with a pose), bar path resets: {}",
        summary.frames_processed, summary.frames_with_pose, summary.path_resets
    );

    if let Some(path) = &args.dump_report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
