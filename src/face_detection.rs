//! Face detection behind a pluggable classifier seam.
//!
//! The pipeline only needs face rectangles; where they come from is opaque.
//! The default backend is a pre-trained SeetaFace frontal cascade via the
//! `rustface` crate. The single piece of logic owned here is the adaptive
//! minimum face size: a fraction of the frame height, computed on the first
//! frame and cached.

use crate::constants::{DEFAULT_SCORE_THRESHOLD, RELATIVE_FACE_SIZE};
use crate::geometry::Region;
use crate::{Error, Result};
use image::GrayImage;
use std::fs;
use std::path::Path;

/// A detected face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDetection {
    /// Bounding box in frame-pixel coordinates
    pub region: Region,
    /// Classifier confidence (backend-specific scale)
    pub score: f64,
}

/// Produces face rectangles from a grayscale frame.
///
/// Implementations may mutate internal caches between frames.
pub trait FaceDetector: Send {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<FaceDetection>>;
}

/// Face detector backed by a pre-trained SeetaFace cascade (`rustface`).
///
/// The model is loaded once; a detector instance is created per frame from
/// the shared model, which keeps the backend `Send` without locking.
pub struct CascadeFaceDetector {
    model: rustface::Model,
    score_threshold: f64,
    relative_face_size: f32,
    min_face_size: Option<u32>,
}

impl CascadeFaceDetector {
    /// Load the cascade model from a file
    pub fn from_model_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(&path)?;
        Self::from_model_bytes(&bytes)
    }

    /// Load the cascade model from raw bytes
    pub fn from_model_bytes(bytes: &[u8]) -> Result<Self> {
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| Error::Detector(format!("failed to read cascade model: {e}")))?;
        Ok(Self {
            model,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            relative_face_size: RELATIVE_FACE_SIZE,
            min_face_size: None,
        })
    }

    /// Override the classifier score threshold
    #[must_use]
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Override the minimum face size fraction; invalidates the cached size
    #[must_use]
    pub fn with_relative_face_size(mut self, fraction: f32) -> Self {
        self.relative_face_size = fraction;
        self.min_face_size = None;
        self
    }

    /// Minimum face size for a frame of the given height, cached after the
    /// first call
    fn adaptive_min_face_size(&mut self, frame_height: u32) -> u32 {
        if let Some(size) = self.min_face_size {
            return size;
        }
        let size = compute_min_face_size(frame_height, self.relative_face_size);
        self.min_face_size = Some(size);
        size
    }
}

/// Minimum face size as a fraction of the frame height, floored at the
/// smallest size the cascade scans for
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
#[must_use]
pub fn compute_min_face_size(frame_height: u32, relative_face_size: f32) -> u32 {
    ((frame_height as f32 * relative_face_size).round() as u32).max(20)
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<FaceDetection>> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let min_face_size = self.adaptive_min_face_size(height);

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face_size);
        detector.set_score_thresh(self.score_threshold);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let image = rustface::ImageData::new(gray.as_raw(), width, height);
        let mut detections: Vec<FaceDetection> = detector
            .detect(&image)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceDetection {
                    region: Region::new(
                        bbox.x(),
                        bbox.y(),
                        bbox.width() as i32,
                        bbox.height() as i32,
                    ),
                    score: face.score(),
                }
            })
            .collect();

        // Highest-confidence face first; the tracker follows detections[0]
        detections.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_min_face_size() {
        assert_eq!(compute_min_face_size(480, RELATIVE_FACE_SIZE), 96);
        assert_eq!(compute_min_face_size(240, RELATIVE_FACE_SIZE), 48);
    }

    #[test]
    fn test_configured_fraction_changes_min_size() {
        // A configured fraction must reach the size computation, not the
        // default constant
        assert_eq!(compute_min_face_size(480, 0.4), 192);
        assert_ne!(compute_min_face_size(480, 0.4), compute_min_face_size(480, RELATIVE_FACE_SIZE));
    }

    #[test]
    fn test_compute_min_face_size_floor() {
        // Tiny frames still get a scannable minimum
        assert_eq!(compute_min_face_size(50, RELATIVE_FACE_SIZE), 20);
    }

    #[test]
    fn test_missing_model_file() {
        assert!(CascadeFaceDetector::from_model_file("/nonexistent/model.bin").is_err());
    }
}
