//! Main application module: feeds image frames through the pipeline and
//! writes annotated copies.

use crate::config::Config;
use crate::draw;
use crate::eye_detection::GradientEyeDetector;
use crate::face_detection::CascadeFaceDetector;
use crate::pipeline::{DetectionPipeline, Frame, PipelineEvent};
use crate::tracking::EyeTracker;
use crate::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use image::RgbaImage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long to wait for the worker's results for one frame
const FRAME_RESULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where frames come from
#[derive(Debug, Clone)]
pub enum FrameInput {
    /// A single image file
    Image(PathBuf),
    /// Every image in a directory, in name order
    Directory(PathBuf),
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Frame source
    pub input: FrameInput,
    /// Directory for annotated frames; omit to skip writing
    pub output_dir: Option<PathBuf>,
    /// Library configuration
    pub config: Config,
}

/// Main application struct
pub struct EyeTrackingApp {
    app_config: AppConfig,
    pipeline: DetectionPipeline,
    events: Receiver<PipelineEvent>,
}

impl EyeTrackingApp {
    /// Create the application: validates config, loads the classifier and
    /// spawns the pipeline worker
    pub fn new(app_config: AppConfig) -> Result<Self> {
        info!("Initializing eye-tracking application");
        app_config.config.validate()?;

        let detector = CascadeFaceDetector::from_model_file(&app_config.config.model.face_model)?
            .with_score_threshold(app_config.config.detector.score_threshold)
            .with_relative_face_size(app_config.config.detector.relative_face_size);
        let tracker = EyeTracker::with_config(
            Box::new(GradientEyeDetector::new()),
            app_config.config.tracker_config(),
        );
        let (pipeline, events) = DetectionPipeline::spawn(Box::new(detector), tracker);

        if let Some(dir) = &app_config.output_dir {
            std::fs::create_dir_all(dir)?;
        }

        Ok(Self { app_config, pipeline, events })
    }

    /// Run over every input frame, then shut the pipeline down
    pub fn run(self) -> Result<()> {
        let paths = collect_frame_paths(&self.app_config.input)?;
        if paths.is_empty() {
            return Err(Error::InvalidInput("no input frames found".to_string()));
        }
        info!("Processing {} frame(s)", paths.len());

        let mut frames_tracked = 0u64;
        let mut frames_dropped = 0u64;

        for (index, path) in paths.iter().enumerate() {
            let index = index as u64;
            let loaded = image::open(path)?;
            let rgba = loaded.to_rgba8();
            let gray = loaded.to_luma8();

            if !self.pipeline.submit(Frame { index, gray }) {
                frames_dropped += 1;
                continue;
            }

            match self.wait_for_frame(index) {
                Ok(outcome) => {
                    if outcome.tracked {
                        frames_tracked += 1;
                    }
                    if let Some(dir) = &self.app_config.output_dir {
                        let annotated = self.annotate(rgba, &outcome);
                        let out_path = annotated_path(dir, path, &self.app_config.config.output.annotated_suffix);
                        annotated.save(&out_path)?;
                        info!("wrote {}", out_path.display());
                    }
                }
                Err(e) => warn!("no result for frame {index}: {e}"),
            }
        }

        self.pipeline.stop();
        info!("Done: {frames_tracked} tracked, {frames_dropped} dropped");
        Ok(())
    }

    /// Drain events until this frame's results are complete
    fn wait_for_frame(&self, index: u64) -> Result<FrameOutcome> {
        let mut outcome = FrameOutcome::default();
        loop {
            let event = self.events.recv_timeout(FRAME_RESULT_TIMEOUT).map_err(|e| match e {
                RecvTimeoutError::Timeout => Error::Pipeline("timed out waiting for worker".to_string()),
                RecvTimeoutError::Disconnected => Error::Pipeline("worker channel closed".to_string()),
            })?;
            match event {
                PipelineEvent::Faces { frame_index, detections } if frame_index == index => {
                    let face_found = !detections.is_empty();
                    outcome.detections = detections;
                    if !face_found {
                        return Ok(outcome);
                    }
                }
                PipelineEvent::Tracking { frame_index, report } if frame_index == index => {
                    info!("frame {frame_index}: {}", report.status);
                    outcome.report = Some(report);
                    outcome.tracked = true;
                    return Ok(outcome);
                }
                PipelineEvent::FrameError { frame_index, message } if frame_index == index => {
                    warn!("frame {frame_index} failed: {message}");
                    return Ok(outcome);
                }
                stale => {
                    // Results for dropped or earlier frames; nothing to do
                    warn!("discarding stale event: {stale:?}");
                }
            }
        }
    }

    fn annotate(&self, mut canvas: RgbaImage, outcome: &FrameOutcome) -> RgbaImage {
        let output = &self.app_config.config.output;
        if output.draw_faces {
            draw::draw_faces(&mut canvas, &outcome.detections);
        }
        if output.draw_tracking {
            if let Some(report) = &outcome.report {
                draw::draw_tracking(&mut canvas, report);
            }
        }
        canvas
    }
}

#[derive(Default)]
struct FrameOutcome {
    detections: Vec<crate::face_detection::FaceDetection>,
    report: Option<crate::tracking::TrackingReport>,
    tracked: bool,
}

/// Expand the input into an ordered list of image paths
fn collect_frame_paths(input: &FrameInput) -> Result<Vec<PathBuf>> {
    match input {
        FrameInput::Image(path) => {
            if !path.is_file() {
                return Err(Error::InvalidInput(format!("not a file: {}", path.display())));
            }
            Ok(vec![path.clone()])
        }
        FrameInput::Directory(dir) => {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|path| is_image_path(path))
                .collect();
            paths.sort();
            Ok(paths)
        }
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp"))
}

fn annotated_path(dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    dir.join(format!("{stem}{suffix}.png"))
}
