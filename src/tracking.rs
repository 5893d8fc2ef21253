//! Learn/match eye-tracking state machine.
//!
//! The tracker spends an initial window of frames learning: each frame it
//! asks the eye locator for an eye box inside each band, picks the darkest
//! point of the box's lower part as the pupil, and crops a small grayscale
//! template around it. Once the window closes it switches to matching and
//! stays there: every frame the stored templates are searched for in their
//! bands by normalized squared differences, and the minimum-score location
//! becomes the new iris estimate.
//!
//! A frame where no eye is found leaves the template unset; matching then
//! skips that eye silently and the previous estimate is kept. There is no
//! path back to the learning phase.

use crate::constants::{
    EYE_BOX_HEIGHT_FRACTION, EYE_BOX_TOP_FRACTION, LEARN_FRAMES_LIMIT, TEMPLATE_SIZE,
};
use crate::eye_detection::EyeDetector;
use crate::geometry::{eye_bands, Point, Region};
use crate::template_matching::{best_match, darkest_point};
use crate::utils::crop_region;
use image::GrayImage;
use log::debug;

/// Phase of the tracking state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    /// Templates are being built from live eye detection
    Learning,
    /// Stored templates are searched for in each new frame
    Matching,
}

/// Tunable tracker parameters
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Frames spent learning before matching begins
    pub learn_frames_limit: u32,
    /// Side length of the square iris template
    pub template_size: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            learn_frames_limit: LEARN_FRAMES_LIMIT,
            template_size: TEMPLATE_SIZE,
        }
    }
}

/// Per-eye iris estimate, in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeObservation {
    /// Estimated iris position
    pub iris: Point,
    /// Template footprint around the iris
    pub template_box: Region,
}

/// What one tracking step produced
#[derive(Debug, Clone)]
pub struct TrackingReport {
    pub phase: TrackingPhase,
    /// Learning frames consumed so far (caps at the learn limit)
    pub frame: u32,
    pub right_band: Region,
    pub left_band: Region,
    pub right: Option<EyeObservation>,
    pub left: Option<EyeObservation>,
    /// Human-readable description of the step, for the event consumer
    pub status: String,
}

struct EyeState {
    template: Option<GrayImage>,
    estimate: Option<EyeObservation>,
}

impl EyeState {
    fn new() -> Self {
        Self { template: None, estimate: None }
    }
}

/// Learn/match iris tracker for one face pipeline
pub struct EyeTracker {
    config: TrackerConfig,
    eye_detector: Box<dyn EyeDetector>,
    frames_seen: u32,
    right: EyeState,
    left: EyeState,
}

impl EyeTracker {
    /// Tracker with default parameters
    #[must_use]
    pub fn new(eye_detector: Box<dyn EyeDetector>) -> Self {
        Self::with_config(eye_detector, TrackerConfig::default())
    }

    #[must_use]
    pub fn with_config(eye_detector: Box<dyn EyeDetector>, config: TrackerConfig) -> Self {
        Self {
            config,
            eye_detector,
            frames_seen: 0,
            right: EyeState::new(),
            left: EyeState::new(),
        }
    }

    /// Current phase; purely a function of the frame counter
    #[must_use]
    pub fn phase(&self) -> TrackingPhase {
        if self.frames_seen < self.config.learn_frames_limit {
            TrackingPhase::Learning
        } else {
            TrackingPhase::Matching
        }
    }

    /// Learning frames consumed so far
    #[must_use]
    pub fn frames_seen(&self) -> u32 {
        self.frames_seen
    }

    /// Run one tracking step for a face on the given grayscale frame
    pub fn process(&mut self, gray: &GrayImage, face: Region) -> TrackingReport {
        let (right_band, left_band) = eye_bands(&face);
        let phase = self.phase();

        let status = match phase {
            TrackingPhase::Learning => {
                // Templates are replaced wholesale every learning frame; a
                // failed build leaves the eye unset
                self.right.template = learn_eye(
                    self.eye_detector.as_ref(),
                    gray,
                    &right_band,
                    self.config.template_size,
                    &mut self.right.estimate,
                );
                self.left.template = learn_eye(
                    self.eye_detector.as_ref(),
                    gray,
                    &left_band,
                    self.config.template_size,
                    &mut self.left.estimate,
                );
                self.frames_seen += 1;
                format!("learning: building eye templates, frame {}", self.frames_seen)
            }
            TrackingPhase::Matching => {
                if let Some(observation) = match_eye(gray, &right_band, self.right.template.as_ref()) {
                    self.right.estimate = Some(observation);
                }
                if let Some(observation) = match_eye(gray, &left_band, self.left.template.as_ref()) {
                    self.left.estimate = Some(observation);
                }
                format!("matching: searching stored templates, frame {}", self.frames_seen)
            }
        };

        TrackingReport {
            phase,
            frame: self.frames_seen,
            right_band,
            left_band,
            right: self.right.estimate,
            left: self.left.estimate,
            status,
        }
    }
}

/// Build an iris template from one eye band.
///
/// Locates the eye, skips its brow region, takes the darkest remaining point
/// as the pupil and crops a square template around it. On success the
/// caller's estimate is refreshed; on any failure `None` is returned and the
/// estimate is left alone.
#[allow(clippy::cast_possible_truncation)]
fn learn_eye(
    detector: &dyn EyeDetector,
    gray: &GrayImage,
    band: &Region,
    template_size: u32,
    estimate: &mut Option<EyeObservation>,
) -> Option<GrayImage> {
    let band_in_frame = band.clamped_to(gray.width(), gray.height())?;
    let band_img = crop_region(gray, &band_in_frame)?;

    let eye_local = detector.detect_eye(&band_img)?;
    let eye_box = eye_local.translated(band_in_frame.x, band_in_frame.y);

    // Skip the brow: keep the lower part of the located box
    let pupil_area = Region::new(
        eye_box.x,
        eye_box.y + (f64::from(eye_box.height) * EYE_BOX_TOP_FRACTION) as i32,
        eye_box.width,
        (f64::from(eye_box.height) * EYE_BOX_HEIGHT_FRACTION) as i32,
    );
    let pupil_in_frame = pupil_area.clamped_to(gray.width(), gray.height())?;
    let pupil_img = crop_region(gray, &pupil_in_frame)?;
    let dark = darkest_point(&pupil_img)?;
    let iris = Point::new(dark.x + pupil_in_frame.x, dark.y + pupil_in_frame.y);

    let half = (template_size / 2) as i32;
    let template_region = Region::new(
        iris.x - half,
        iris.y - half,
        template_size as i32,
        template_size as i32,
    );
    let template_in_frame = template_region.clamped_to(gray.width(), gray.height())?;
    let template = crop_region(gray, &template_in_frame)?;
    if template.width() == 0 || template.height() == 0 {
        debug!("template collapsed to zero area at {iris:?}");
        return None;
    }

    *estimate = Some(EyeObservation {
        iris,
        template_box: template_in_frame,
    });
    Some(template)
}

/// Search the stored template inside one eye band.
///
/// Returns `None` when the template is unset or does not fit, in which case
/// the caller keeps its previous estimate.
fn match_eye(gray: &GrayImage, band: &Region, template: Option<&GrayImage>) -> Option<EyeObservation> {
    let template = template?;
    let band_in_frame = band.clamped_to(gray.width(), gray.height())?;
    let band_img = crop_region(gray, &band_in_frame)?;

    let found = best_match(&band_img, template)?;
    let template_box = Region::new(
        found.location.x + band_in_frame.x,
        found.location.y + band_in_frame.y,
        template.width() as i32,
        template.height() as i32,
    );
    Some(EyeObservation {
        iris: template_box.center(),
        template_box,
    })
}
