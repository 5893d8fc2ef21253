//! Eye-tracking application: face detection plus learn/match iris tracking
//! over image frames.

use anyhow::Result;
use clap::Parser;
use eye_tracking::app::{AppConfig, EyeTrackingApp, FrameInput};
use eye_tracking::config::Config;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file or directory of frames
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for annotated output frames
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the face cascade model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Frames spent learning before matching begins
    #[arg(long)]
    learn_limit: Option<u32>,

    /// Side length of the square iris template
    #[arg(long)]
    template_size: Option<u32>,

    /// Classifier score threshold
    #[arg(long)]
    score_threshold: Option<f64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Eye Tracking - learn/match iris tracker");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(model) = args.model {
        config.model.face_model = model;
    }
    if let Some(limit) = args.learn_limit {
        config.tracker.learn_frames_limit = limit;
    }
    if let Some(size) = args.template_size {
        config.tracker.template_size = size;
    }
    if let Some(threshold) = args.score_threshold {
        config.detector.score_threshold = threshold;
    }

    let input = if args.input.is_dir() {
        FrameInput::Directory(args.input)
    } else {
        FrameInput::Image(args.input)
    };

    // Create and run application
    let app = EyeTrackingApp::new(AppConfig {
        input,
        output_dir: args.output,
        config,
    })?;
    app.run()?;

    Ok(())
}
