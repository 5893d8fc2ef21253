//! Constants used throughout the application

/// Number of frames spent building templates before matching begins
pub const LEARN_FRAMES_LIMIT: u32 = 50;

/// Side length of the square iris template in pixels
pub const TEMPLATE_SIZE: u32 = 24;

/// Face height divisor giving the eye band's vertical offset
pub const EYE_BAND_TOP_DIVISOR: f64 = 4.5;

/// Face height divisor giving the eye band height
pub const EYE_BAND_HEIGHT_DIVISOR: f64 = 3.0;

/// Face width divisor giving the side margin of the eye band
pub const EYE_BAND_MARGIN_DIVISOR: f64 = 16.0;

/// Fraction of a located eye box skipped from the top (brow region)
pub const EYE_BOX_TOP_FRACTION: f64 = 0.4;

/// Fraction of a located eye box kept below the brow cut
pub const EYE_BOX_HEIGHT_FRACTION: f64 = 0.6;

/// Minimum face size as a fraction of frame height
pub const RELATIVE_FACE_SIZE: f32 = 0.2;

/// Width the eye band is downscaled to before gradient voting
pub const FAST_EYE_WIDTH: u32 = 50;

/// Standard-deviation factor for the gradient magnitude threshold
pub const GRADIENT_THRESHOLD_FACTOR: f64 = 50.0;

/// Gaussian blur sigma applied to the darkness weight image
pub const WEIGHT_BLUR_SIGMA: f32 = 2.0;

/// Default detector score threshold
pub const DEFAULT_SCORE_THRESHOLD: f64 = 2.0;

/// Depth of the pipeline frame queue; frames beyond it are dropped
pub const FRAME_QUEUE_DEPTH: usize = 1;
