//! Configuration management for the eye-tracking application

use crate::tracking::TrackerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier model configuration
    pub model: ModelConfig,

    /// Face detection configuration
    pub detector: DetectorConfig,

    /// Eye tracker configuration
    pub tracker: TrackerSettings,

    /// Overlay output configuration
    pub output: OutputConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the SeetaFace frontal cascade model
    pub face_model: PathBuf,
}

/// Face detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Classifier score threshold
    pub score_threshold: f64,

    /// Minimum face size as a fraction of frame height (0.0-1.0)
    pub relative_face_size: f32,
}

/// Eye tracker parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Frames spent learning before matching begins
    pub learn_frames_limit: u32,

    /// Side length of the square iris template in pixels
    pub template_size: u32,
}

/// Overlay output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Draw face bounding boxes
    pub draw_faces: bool,

    /// Draw eye bands, template footprints and iris markers
    pub draw_tracking: bool,

    /// Suffix appended to annotated output file stems
    pub annotated_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            detector: DetectorConfig::default(),
            tracker: TrackerSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_model: PathBuf::from("assets/seeta_fd_frontal_v1.0.bin"),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            score_threshold: crate::constants::DEFAULT_SCORE_THRESHOLD,
            relative_face_size: crate::constants::RELATIVE_FACE_SIZE,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            learn_frames_limit: crate::constants::LEARN_FRAMES_LIMIT,
            template_size: crate::constants::TEMPLATE_SIZE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            draw_faces: true,
            draw_tracking: true,
            annotated_suffix: "_annotated".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Tracker parameters as the tracker consumes them
    #[must_use]
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            learn_frames_limit: self.tracker.learn_frames_limit,
            template_size: self.tracker.template_size,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detector.relative_face_size) {
            return Err(Error::Config(
                "Relative face size must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.detector.score_threshold < 0.0 {
            return Err(Error::Config("Score threshold must not be negative".to_string()));
        }
        if self.tracker.learn_frames_limit == 0 {
            return Err(Error::Config(
                "Learn frames limit must be greater than 0".to_string(),
            ));
        }
        if self.tracker.template_size < 2 {
            return Err(Error::Config("Template size must be at least 2".to_string()));
        }
        if !self.model.face_model.exists() {
            return Err(Error::Config(format!(
                "Face model not found: {}",
                self.model.face_model.display()
            )));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Eye Tracking Configuration

# Model paths
model:
  face_model: "assets/seeta_fd_frontal_v1.0.bin"

# Face detection parameters
detector:
  score_threshold: 2.0
  relative_face_size: 0.2

# Eye tracker parameters
tracker:
  learn_frames_limit: 50
  template_size: 24

# Overlay output
output:
  draw_faces: true
  draw_tracking: true
  annotated_suffix: "_annotated"
"#;
